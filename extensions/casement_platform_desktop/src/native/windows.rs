//! Win32 native decoration hook
//!
//! Each decorated window is subclassed with `SetWindowSubclass`. Hit-test
//! results the default procedure reports as client area are re-classified
//! from the window's [`HitTestRouter`], so the OS performs caption drags,
//! edge resizes, Aero Snap and the system menu itself. Results the OS
//! already claims are never touched.

use std::ffi::c_void;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use casement_core::{ClipShape, Color, DevicePoint, Insets};
use casement_decor::{AccentNotifier, HitTestRouter, NativeHook, Region, SystemAccent};
use casement_platform::{PlatformError, Result, ScaleTransform, Window, WindowId};
use parking_lot::Mutex;
use raw_window_handle::RawWindowHandle;
use rustc_hash::FxHashMap;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateRectRgn, CreateRoundRectRgn, DeleteObject, GetMonitorInfoW, MonitorFromWindow,
    ScreenToClient, SetWindowRgn, HRGN, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::System::Registry::{RegGetValueW, HKEY_CURRENT_USER, RRF_RT_REG_DWORD};
use windows::Win32::UI::HiDpi::{GetDpiForWindow, GetSystemMetricsForDpi};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetWindowLongW, IsZoomed, ShowWindow, GWL_STYLE, HTBOTTOM, HTBOTTOMLEFT,
    HTBOTTOMRIGHT, HTCAPTION, HTCLIENT, HTCLOSE, HTLEFT, HTMAXBUTTON, HTMINBUTTON, HTRIGHT,
    HTSYSMENU, HTTOP, HTTOPLEFT, HTTOPRIGHT, SM_CXPADDEDBORDER, SM_CYSIZEFRAME, SW_MAXIMIZE,
    WM_NCDESTROY, WM_NCHITTEST, WS_THICKFRAME,
};

const SUBCLASS_ID: usize = 0x4341_534D;
const WM_DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;
const USER_DEFAULT_DPI: u32 = 96;

/// Per-window data the subclass procedure receives as its reference data.
/// Hit testing reads it directly, never through [`HookState`].
struct SubclassData {
    router: Arc<HitTestRouter>,
}

struct HookedWindow {
    id: WindowId,
    /// `Box<SubclassData>` pointer handed to `SetWindowSubclass`
    data: usize,
}

impl HookedWindow {
    /// # Safety
    ///
    /// The subclass using `data` must already be removed.
    unsafe fn free(self) {
        // SAFETY: `data` came from `Box::into_raw` in `install` and is freed
        // only by whoever removed this entry from the registry
        drop(unsafe { Box::from_raw(self.data as *mut SubclassData) });
    }
}

/// Install/uninstall bookkeeping and the accent notifier
#[derive(Default)]
struct HookState {
    /// Keyed by HWND value
    windows: FxHashMap<isize, HookedWindow>,
    notifier: Option<AccentNotifier>,
}

fn state() -> &'static Mutex<HookState> {
    static STATE: OnceLock<Mutex<HookState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(HookState::default()))
}

fn hwnd_of(handle: RawWindowHandle) -> Option<HWND> {
    match handle {
        RawWindowHandle::Win32(handle) => Some(HWND(handle.hwnd.get() as *mut c_void)),
        _ => None,
    }
}

fn hwnd_for(id: WindowId) -> Option<HWND> {
    let state = state().lock();
    state
        .windows
        .iter()
        .find(|(_, hooked)| hooked.id == id)
        .map(|(&key, _)| HWND(key as *mut c_void))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hit testing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameHit {
    /// Side or corner resize result, final
    Edge(u32),
    /// Top resize band; spots in the title bar still win over it
    Top,
    Inside,
}

/// Classify a client point against the resize band along the window frame
fn frame_hit(x: i32, y: i32, width: i32, height: i32, band: i32) -> FrameHit {
    if band <= 0 {
        return FrameHit::Inside;
    }

    let left = x < band;
    let right = x >= width - band;
    let top = y < band;
    let bottom = y >= height - band;

    match (top, bottom, left, right) {
        (true, _, true, _) => FrameHit::Edge(HTTOPLEFT),
        (true, _, _, true) => FrameHit::Edge(HTTOPRIGHT),
        (_, true, true, _) => FrameHit::Edge(HTBOTTOMLEFT),
        (_, true, _, true) => FrameHit::Edge(HTBOTTOMRIGHT),
        (true, _, _, _) => FrameHit::Top,
        (_, true, _, _) => FrameHit::Edge(HTBOTTOM),
        (_, _, true, _) => FrameHit::Edge(HTLEFT),
        (_, _, _, true) => FrameHit::Edge(HTRIGHT),
        _ => FrameHit::Inside,
    }
}

fn region_to_hit(region: Region) -> u32 {
    match region {
        Region::Client => HTCLIENT,
        Region::Caption => HTCAPTION,
        Region::SysMenu => HTSYSMENU,
        Region::Resize => HTTOP,
        Region::MinimizeButton => HTMINBUTTON,
        Region::MaximizeButton => HTMAXBUTTON,
        Region::CloseButton => HTCLOSE,
    }
}

/// Height of the invisible resize band for a monitor DPI
fn resize_band(dpi: u32) -> i32 {
    // SAFETY: plain metric queries with a valid DPI
    unsafe {
        GetSystemMetricsForDpi(SM_CXPADDEDBORDER, dpi) + GetSystemMetricsForDpi(SM_CYSIZEFRAME, dpi)
    }
}

/// Whether a window style carries a sizing border
fn has_resize_frame(style: u32) -> bool {
    style & WS_THICKFRAME.0 != 0
}

fn hit_test(hwnd: HWND, lparam: LPARAM, data: &SubclassData) -> Option<LRESULT> {
    // read per query; resizability can change after install
    // SAFETY: style query on the live window the OS is querying
    let style = unsafe { GetWindowLongW(hwnd, GWL_STYLE) } as u32;
    let resizable = has_resize_frame(style);

    // screen coordinates packed as signed 16-bit values
    let mut point = POINT {
        x: (lparam.0 & 0xFFFF) as i16 as i32,
        y: ((lparam.0 >> 16) & 0xFFFF) as i16 as i32,
    };
    let mut client = RECT::default();

    // SAFETY: hwnd is the live window the OS is querying; both pointers refer
    // to locals that outlive the calls
    let (dpi, maximized) = unsafe {
        if !ScreenToClient(hwnd, &mut point).as_bool() {
            return None;
        }
        GetClientRect(hwnd, &mut client).ok()?;
        (GetDpiForWindow(hwnd).max(USER_DEFAULT_DPI), IsZoomed(hwnd).as_bool())
    };

    let band = if resizable && !maximized { resize_band(dpi) } else { 0 };
    let transform = ScaleTransform::uniform(dpi as f64 / USER_DEFAULT_DPI as f64);
    let device = DevicePoint::new(point.x, point.y);

    let hit = match frame_hit(point.x, point.y, client.right, client.bottom, band) {
        FrameHit::Edge(hit) => hit,
        FrameHit::Top => region_to_hit(data.router.classify_device(device, transform, true)),
        FrameHit::Inside => region_to_hit(data.router.classify_device(device, transform, false)),
    };
    Some(LRESULT(hit as isize))
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    data: usize,
) -> LRESULT {
    match msg {
        WM_NCHITTEST => {
            // SAFETY: unmodified message forwarded to the next procedure in
            // the subclass chain
            let result = unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) };
            if result.0 != HTCLIENT as isize || data == 0 {
                return result;
            }
            // SAFETY: `data` is the `SubclassData` installed with this
            // subclass; it is freed only after the subclass is removed
            let data = unsafe { &*(data as *const SubclassData) };
            hit_test(hwnd, lparam, data).unwrap_or(result)
        }
        WM_DWMCOLORIZATIONCOLORCHANGED => {
            let notifier = state().lock().notifier.clone();
            if let Some(notifier) = notifier {
                notifier.notify(Instant::now());
            }
            // SAFETY: as above
            unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
        }
        WM_NCDESTROY => {
            let hooked = state().lock().windows.remove(&(hwnd.0 as isize));
            // SAFETY: removing our own subclass from the window being destroyed,
            // then freeing its data
            unsafe {
                let _ = RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID);
                if let Some(hooked) = hooked {
                    hooked.free();
                }
                DefSubclassProc(hwnd, msg, wparam, lparam)
            }
        }
        // SAFETY: as above
        _ => unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accent color
// ─────────────────────────────────────────────────────────────────────────────

fn read_dwm_dword(name: PCWSTR) -> Option<u32> {
    let mut value = 0u32;
    let mut size = std::mem::size_of::<u32>() as u32;
    // SAFETY: value and size point at locals sized for a REG_DWORD
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            w!("Software\\Microsoft\\Windows\\DWM"),
            name,
            RRF_RT_REG_DWORD,
            None,
            Some(&mut value as *mut u32 as *mut c_void),
            Some(&mut size as *mut u32),
        )
    };
    status.is_ok().then_some(value)
}

fn read_system_accent() -> Option<SystemAccent> {
    // 0xAARRGGBB
    let colorization = read_dwm_dword(w!("ColorizationColor"))?;
    Some(SystemAccent {
        affects_borders: read_dwm_dword(w!("ColorPrevalence")).unwrap_or(0) != 0,
        colorization: Some(Color::from_hex(colorization & 0x00FF_FFFF)),
        balance: read_dwm_dword(w!("ColorizationColorBalance")).map_or(100, |balance| balance as i32),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape and monitor helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Clip a window to `shape` (device pixels), or remove the clip
pub(crate) fn apply_shape(handle: RawWindowHandle, shape: Option<&ClipShape>) -> Result<()> {
    let hwnd = hwnd_of(handle).ok_or_else(|| PlatformError::Unsupported("non-Win32 window".to_string()))?;

    // SAFETY: the region is created here; on success the window owns it
    unsafe {
        let region = match shape {
            None => HRGN::default(),
            Some(ClipShape::Rect(rect)) => CreateRectRgn(
                rect.left() as i32,
                rect.top() as i32,
                rect.right() as i32,
                rect.bottom() as i32,
            ),
            Some(ClipShape::RoundedRect {
                rect,
                corner_radius,
            }) => {
                let diameter = (corner_radius.to_array()[0] * 2.0).round() as i32;
                // GDI excludes the right and bottom edges of round rect regions
                CreateRoundRectRgn(
                    rect.left() as i32,
                    rect.top() as i32,
                    rect.right() as i32 + 1,
                    rect.bottom() as i32 + 1,
                    diameter,
                    diameter,
                )
            }
        };

        if SetWindowRgn(hwnd, region, BOOL::from(true)) == 0 {
            if !region.is_invalid() {
                let _ = DeleteObject(region);
            }
            return Err(PlatformError::Other("SetWindowRgn failed".to_string()));
        }
    }
    Ok(())
}

/// Task bar reservations of the window's monitor, in device pixels
pub(crate) fn work_area_insets(handle: RawWindowHandle) -> Option<Insets> {
    let hwnd = hwnd_of(handle)?;
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: info is a properly sized MONITORINFO
    unsafe {
        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        if !GetMonitorInfoW(monitor, &mut info).as_bool() {
            return None;
        }
    }

    let (full, work) = (info.rcMonitor, info.rcWork);
    Some(Insets::new(
        (work.top - full.top) as f32,
        (work.left - full.left) as f32,
        (full.bottom - work.bottom) as f32,
        (full.right - work.right) as f32,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook
// ─────────────────────────────────────────────────────────────────────────────

/// Native hook backed by Win32 window subclassing
pub struct WindowsHook;

impl NativeHook for WindowsHook {
    fn name(&self) -> &str {
        "win32-subclass"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn install(&self, window: &dyn Window, router: Arc<HitTestRouter>) -> Result<()> {
        let hwnd = window
            .raw_window_handle()
            .and_then(hwnd_of)
            .ok_or_else(|| PlatformError::Unavailable("Win32 window handle".to_string()))?;
        let key = hwnd.0 as isize;
        let data = Box::into_raw(Box::new(SubclassData { router })) as usize;

        // SAFETY: hwnd is a live window owned by this thread; `data` stays
        // valid until the subclass is removed
        let installed = unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, data) };
        if !installed.as_bool() {
            // SAFETY: never handed to a live subclass
            drop(unsafe { Box::from_raw(data as *mut SubclassData) });
            return Err(PlatformError::Other("SetWindowSubclass failed".to_string()));
        }

        let replaced = state().lock().windows.insert(key, HookedWindow { id: window.id(), data });
        if let Some(previous) = replaced {
            // SAFETY: the subclass now points at the new data
            unsafe { previous.free() };
        }

        tracing::debug!(id = ?window.id(), "win32 hit-test hook installed");
        Ok(())
    }

    fn uninstall(&self, window: WindowId) {
        let Some(hwnd) = hwnd_for(window) else {
            return;
        };
        let Some(hooked) = state().lock().windows.remove(&(hwnd.0 as isize)) else {
            return;
        };
        // SAFETY: removing our own subclass before freeing the data it used
        unsafe {
            let _ = RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID);
            hooked.free();
        }
    }

    fn maximize(&self, window: WindowId) -> bool {
        let Some(hwnd) = hwnd_for(window) else {
            return false;
        };
        // SAFETY: hwnd belongs to a hooked, live window
        unsafe {
            let _ = ShowWindow(hwnd, SW_MAXIMIZE);
        }
        true
    }

    fn watch_accent(&self, notifier: AccentNotifier) {
        state().lock().notifier = Some(notifier);
    }

    fn system_accent(&self) -> Option<SystemAccent> {
        read_system_accent()
    }
}
