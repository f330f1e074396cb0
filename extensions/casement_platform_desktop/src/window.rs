//! Desktop window implementation using winit

use casement_core::{ClipShape, Insets, Point, Rect, Size};
use casement_platform::{
    Cursor, MonitorInfo, PlatformError, ResizeDirection, Result, Window, WindowConfig, WindowId,
    WindowState,
};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::MonitorHandle;
use winit::window::{CursorIcon, ResizeDirection as WinitResizeDirection, Window as WinitWindow, WindowAttributes};

/// Desktop window wrapping a winit window
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
    min_size: Option<Size>,
    focused: AtomicBool,
}

impl DesktopWindow {
    /// Create a new desktop window
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> std::result::Result<Self, winit::error::OsError> {
        let mut attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_decorations(config.decorations)
            .with_transparent(config.transparent);

        if let Some(min) = config.min_size {
            attrs = attrs.with_min_inner_size(LogicalSize::new(min.width, min.height));
        }
        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(attrs)?);

        Ok(Self {
            window,
            min_size: config.min_size,
            focused: AtomicBool::new(true),
        })
    }

    /// Get the underlying winit window
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }

    /// Get an Arc to the winit window
    pub fn winit_window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Set focus state (called by event loop)
    pub(crate) fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }

    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }

    fn monitor_info(&self, monitor: &MonitorHandle) -> MonitorInfo {
        // winit reports monitors in physical pixels; the decoration quirk
        // table converts them
        let position = monitor.position();
        let size = monitor.size();
        let primary_scale = self
            .window
            .primary_monitor()
            .map_or(monitor.scale_factor(), |primary| primary.scale_factor());

        let mut info = MonitorInfo::new(
            Point::new(position.x as f32, position.y as f32),
            Size::new(size.width as f32, size.height as f32),
            monitor.scale_factor(),
        )
        .with_primary_scale_factor(primary_scale)
        .with_insets(self.work_area_insets().unwrap_or(Insets::ZERO));

        if let Some(name) = monitor.name() {
            info = info.with_name(name);
        }
        info
    }

    #[cfg(target_os = "windows")]
    fn work_area_insets(&self) -> Option<Insets> {
        crate::native::windows::work_area_insets(self.raw_window_handle()?)
    }

    #[cfg(not(target_os = "windows"))]
    fn work_area_insets(&self) -> Option<Insets> {
        None
    }
}

fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Default => CursorIcon::Default,
        Cursor::Pointer => CursorIcon::Pointer,
        Cursor::Move => CursorIcon::Move,
        Cursor::ResizeNS => CursorIcon::NsResize,
        Cursor::ResizeEW => CursorIcon::EwResize,
        Cursor::ResizeNESW => CursorIcon::NeswResize,
        Cursor::ResizeNWSE => CursorIcon::NwseResize,
    }
}

fn winit_direction(direction: ResizeDirection) -> WinitResizeDirection {
    match direction {
        ResizeDirection::North => WinitResizeDirection::North,
        ResizeDirection::South => WinitResizeDirection::South,
        ResizeDirection::East => WinitResizeDirection::East,
        ResizeDirection::West => WinitResizeDirection::West,
        ResizeDirection::NorthEast => WinitResizeDirection::NorthEast,
        ResizeDirection::NorthWest => WinitResizeDirection::NorthWest,
        ResizeDirection::SouthEast => WinitResizeDirection::SouthEast,
        ResizeDirection::SouthWest => WinitResizeDirection::SouthWest,
    }
}

impl Window for DesktopWindow {
    fn id(&self) -> WindowId {
        WindowId(u64::from(self.window.id()))
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        self.window.window_handle().ok().map(|handle| handle.as_raw())
    }

    fn bounds(&self) -> Rect {
        let scale = self.window.scale_factor();
        // Wayland never reports positions
        let origin = self
            .window
            .outer_position()
            .map(|pos| pos.to_logical::<f32>(scale))
            .unwrap_or(LogicalPosition::new(0.0, 0.0));
        let size = self.window.outer_size().to_logical::<f32>(scale);
        Rect::new(origin.x, origin.y, size.width, size.height)
    }

    fn set_bounds(&self, bounds: Rect) {
        self.window
            .set_outer_position(LogicalPosition::new(bounds.x(), bounds.y()));
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(bounds.width(), bounds.height()));
    }

    fn state(&self) -> WindowState {
        let maximized = self.window.is_maximized();
        WindowState {
            maximized_horizontal: maximized,
            maximized_vertical: maximized,
            fullscreen: self.window.fullscreen().is_some(),
            minimized: self.window.is_minimized().unwrap_or(false),
        }
    }

    fn set_maximized(&self, maximized: bool) {
        self.window.set_maximized(maximized);
    }

    fn is_resizable(&self) -> bool {
        self.window.is_resizable()
    }

    fn minimum_size(&self) -> Option<Size> {
        self.min_size
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn current_monitor(&self) -> Option<MonitorInfo> {
        let monitor = self.window.current_monitor()?;
        Some(self.monitor_info(&monitor))
    }

    fn screen_size(&self) -> Option<Size> {
        let primary = self.window.primary_monitor()?;
        let size = primary.size().to_logical::<f32>(primary.scale_factor());
        Some(Size::new(size.width, size.height))
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.window.set_cursor(cursor_icon(cursor));
    }

    #[cfg(target_os = "windows")]
    fn set_shape(&self, shape: Option<&ClipShape>) -> Result<()> {
        let handle = self
            .raw_window_handle()
            .ok_or_else(|| PlatformError::Unavailable("window handle".to_string()))?;
        crate::native::windows::apply_shape(handle, shape)
    }

    #[cfg(not(target_os = "windows"))]
    fn set_shape(&self, _shape: Option<&ClipShape>) -> Result<()> {
        Err(PlatformError::Unsupported("window shaping".to_string()))
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn begin_move(&self) -> Result<()> {
        self.window
            .drag_window()
            .map_err(|e| PlatformError::Unsupported(e.to_string()))
    }

    fn begin_resize(&self, direction: ResizeDirection) -> Result<()> {
        self.window
            .drag_resize_window(winit_direction(direction))
            .map_err(|e| PlatformError::Unsupported(e.to_string()))
    }
}

// Safety: Window operations are thread-safe via winit's internal synchronization
unsafe impl Send for DesktopWindow {}
unsafe impl Sync for DesktopWindow {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_cursors_map_to_winit() {
        assert_eq!(cursor_icon(Cursor::ResizeNS), CursorIcon::NsResize);
        assert_eq!(cursor_icon(Cursor::ResizeNWSE), CursorIcon::NwseResize);
        for direction in ResizeDirection::ALL {
            assert_ne!(cursor_icon(direction.cursor()), CursorIcon::Default);
        }
    }

    #[test]
    fn test_directions_map_one_to_one() {
        assert_eq!(winit_direction(ResizeDirection::NorthWest), WinitResizeDirection::NorthWest);
        assert_eq!(winit_direction(ResizeDirection::South), WinitResizeDirection::South);
    }
}
