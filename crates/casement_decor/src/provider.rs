//! Window decoration provider
//!
//! Entry point for applications. Picks one [`DecorationMode`] per process:
//!
//! - **NativeOsHook**: a platform hook answers the OS's hit-test queries from
//!   the [`HitTestRouter`]; the OS drags, resizes, snaps and draws shadows.
//! - **RuntimeIntegrated**: the windowing runtime can start interactive
//!   moves and resizes; the provider classifies presses and hands them over.
//! - **None**: pure overlay. Resize handles and window shaping are emulated
//!   in the toolkit's own event and paint pipeline.
//!
//! Everything mode-specific sits behind one strategy object chosen at
//! construction.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use casement_core::{Color, Point, Rect};
use casement_platform::{Cursor, RuntimeEnvironment, Window, WindowId, WindowState};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::accent::{border_color, AccentColorSource, AccentNotifier, SystemAccent, ThemeVariant};
use crate::config::{DecorationConfig, ForcedMode};
use crate::error::{DecorError, Result};
use crate::hit_test::{HitTestInfo, HitTestRouter, Region};
use crate::maximize::{MaximizedBounds, MaximizedBoundsResolver};
use crate::native::{native_hook, NativeHook};
use crate::resize::{DragResizeEngine, ResizeLifecycle};
use crate::shape::{BorderPainter, WindowClip, WindowShapeManager};

new_key_type! {
    /// Handle to a window registered with the provider
    pub struct DecorationHandle;
}

/// Mechanism supplying window chrome behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecorationMode {
    NativeOsHook,
    RuntimeIntegrated,
    None,
}

/// What the platform back end can do, reported at startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// OS is new enough for native hit-test hooking
    pub native_os_supported: bool,
    /// Runtime can start interactive window moves and resizes
    pub runtime_move_resize: bool,
}

/// Pick a mode. Never fails: anything missing degrades to the next mode.
pub fn probe_mode(
    config: &DecorationConfig,
    caps: Capabilities,
    hook: Option<&dyn NativeHook>,
) -> DecorationMode {
    if !config.use_window_decorations {
        return DecorationMode::None;
    }

    let native = caps.native_os_supported && hook.is_some_and(|h| h.is_supported());
    match config.force_mode {
        Some(ForcedMode::None) => DecorationMode::None,
        Some(ForcedMode::Runtime) if caps.runtime_move_resize => DecorationMode::RuntimeIntegrated,
        Some(ForcedMode::Native) if native => DecorationMode::NativeOsHook,
        Some(forced) => {
            tracing::warn!(?forced, "requested decoration mode unavailable, using overlay");
            DecorationMode::None
        }
        None if native => DecorationMode::NativeOsHook,
        None if caps.runtime_move_resize => DecorationMode::RuntimeIntegrated,
        None => DecorationMode::None,
    }
}

static DETECTED_MODE: OnceLock<DecorationMode> = OnceLock::new();

/// Probe once per process; later calls return the first answer
pub fn detect_mode(config: &DecorationConfig, caps: Capabilities) -> DecorationMode {
    *DETECTED_MODE.get_or_init(|| {
        let hook = native_hook();
        let mode = probe_mode(config, caps, hook.as_deref());
        tracing::debug!(?mode, ?caps, "decoration mode selected");
        mode
    })
}

/// Result of routing a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The decoration layer handled the event
    Consumed,
    /// The application handles the event; `Region` tells drag from click
    Passed(Region),
}

/// Delivered to accent listeners once per burst of OS accent changes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccentChange {
    pub system: Option<SystemAccent>,
}

type AccentListener = Box<dyn FnMut(&AccentChange)>;
type ResizeListener = Box<dyn FnMut(DecorationHandle, ResizeLifecycle)>;

// ─────────────────────────────────────────────────────────────────────────────
// Per-window state
// ─────────────────────────────────────────────────────────────────────────────

struct DecoratedWindow {
    window: Arc<dyn Window>,
    router: Arc<HitTestRouter>,
    engine: DragResizeEngine,
    shape: WindowShapeManager,
    last_state: WindowState,
    maximized_bounds_up_to_date: bool,
    active: bool,
    cursor: Cursor,
}

impl DecoratedWindow {
    fn new(window: Arc<dyn Window>, info: HitTestInfo, config: &DecorationConfig) -> Self {
        let last_state = window.state();
        Self {
            window,
            router: Arc::new(HitTestRouter::new(info)),
            engine: DragResizeEngine::new(config.handle_metrics(), config.minimum_size_policy()),
            shape: WindowShapeManager::new(config.border_corner_radius, config.border_width),
            last_state,
            maximized_bounds_up_to_date: false,
            active: true,
            cursor: Cursor::Default,
        }
    }

    fn screen_point(&self, local: Point) -> Point {
        let bounds = self.window.bounds();
        local.offset(bounds.x(), bounds.y())
    }

    fn relayout(&mut self, overlay: bool) {
        let window = &*self.window;
        self.engine
            .layout(window.bounds().size, window.is_resizable(), window.state());
        if overlay {
            self.shape.update(window);
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.window.set_cursor(cursor);
        }
    }

    fn classify_overlay(&self, local: Point) -> Region {
        let on_handle = self.engine.handles().direction_at(local).is_some();
        self.router.classify(local, on_handle)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

trait DecorationStrategy {
    fn mode(&self) -> DecorationMode;

    fn attach(&self, entry: &DecoratedWindow);

    fn detach(&self, entry: &mut DecoratedWindow);

    /// Overlay handles and window shaping run in this mode
    fn drives_overlay(&self) -> bool;

    fn pointer_pressed(
        &self,
        entry: &mut DecoratedWindow,
        local: Point,
    ) -> (PointerOutcome, Option<ResizeLifecycle>);

    fn pointer_moved(&self, entry: &mut DecoratedWindow, local: Point) -> PointerOutcome;

    fn pointer_released(&self, entry: &mut DecoratedWindow) -> Option<ResizeLifecycle>;

    /// Maximize without resolving bounds first. `false` leaves it to the
    /// provider.
    fn maximize(&self, window: &dyn Window) -> bool;

    fn watch_accent(&self, _notifier: &AccentNotifier) {}

    fn system_accent(&self) -> Option<SystemAccent> {
        None
    }
}

fn overlay_pressed(
    entry: &mut DecoratedWindow,
    local: Point,
) -> (PointerOutcome, Option<ResizeLifecycle>) {
    let screen = entry.screen_point(local);
    if let Some(started) = entry.engine.press(&*entry.window, screen) {
        return (PointerOutcome::Consumed, Some(started));
    }
    (PointerOutcome::Passed(entry.classify_overlay(local)), None)
}

fn overlay_moved(entry: &mut DecoratedWindow, local: Point) -> PointerOutcome {
    if entry.engine.is_active() {
        let screen = entry.screen_point(local);
        if entry.engine.drag(&*entry.window, screen).is_some() {
            entry.shape.update(&*entry.window);
        }
        return PointerOutcome::Consumed;
    }

    let cursor = entry.engine.cursor_at(local).unwrap_or_default();
    entry.set_cursor(cursor);
    PointerOutcome::Passed(entry.classify_overlay(local))
}

fn overlay_released(entry: &mut DecoratedWindow) -> Option<ResizeLifecycle> {
    entry.engine.release()
}

/// Hand resolved bounds to the back end; `false` when it has no hint for them
fn apply_maximized_bounds(window: &dyn Window, bounds: &MaximizedBounds) -> bool {
    match window.set_maximized_bounds(Some(bounds.to_screen())) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(%err, "maximized bounds not applied");
            false
        }
    }
}

struct NativeHookStrategy {
    hook: Arc<dyn NativeHook>,
}

impl DecorationStrategy for NativeHookStrategy {
    fn mode(&self) -> DecorationMode {
        DecorationMode::NativeOsHook
    }

    fn attach(&self, entry: &DecoratedWindow) {
        if let Err(err) = self.hook.install(&*entry.window, Arc::clone(&entry.router)) {
            tracing::warn!(hook = self.hook.name(), %err, "native hit-test hook not installed");
        }
    }

    fn detach(&self, entry: &mut DecoratedWindow) {
        self.hook.uninstall(entry.window.id());
    }

    fn drives_overlay(&self) -> bool {
        false
    }

    fn pointer_pressed(
        &self,
        entry: &mut DecoratedWindow,
        local: Point,
    ) -> (PointerOutcome, Option<ResizeLifecycle>) {
        // the OS already consumed non-client presses
        (PointerOutcome::Passed(entry.router.classify(local, false)), None)
    }

    fn pointer_moved(&self, entry: &mut DecoratedWindow, local: Point) -> PointerOutcome {
        PointerOutcome::Passed(entry.router.classify(local, false))
    }

    fn pointer_released(&self, _entry: &mut DecoratedWindow) -> Option<ResizeLifecycle> {
        None
    }

    fn maximize(&self, window: &dyn Window) -> bool {
        if !self.hook.maximize(window.id()) {
            window.set_maximized(true);
        }
        true
    }

    fn watch_accent(&self, notifier: &AccentNotifier) {
        self.hook.watch_accent(notifier.clone());
    }

    fn system_accent(&self) -> Option<SystemAccent> {
        self.hook.system_accent()
    }
}

struct RuntimeIntegratedStrategy;

impl DecorationStrategy for RuntimeIntegratedStrategy {
    fn mode(&self) -> DecorationMode {
        DecorationMode::RuntimeIntegrated
    }

    fn attach(&self, _entry: &DecoratedWindow) {}

    fn detach(&self, entry: &mut DecoratedWindow) {
        entry.shape.clear(&*entry.window);
    }

    fn drives_overlay(&self) -> bool {
        true
    }

    fn pointer_pressed(
        &self,
        entry: &mut DecoratedWindow,
        local: Point,
    ) -> (PointerOutcome, Option<ResizeLifecycle>) {
        if let Some(direction) = entry.engine.handles().direction_at(local) {
            match entry.window.begin_resize(direction) {
                Ok(()) => return (PointerOutcome::Consumed, None),
                Err(err) => {
                    tracing::debug!(%err, "runtime resize refused, resizing in overlay");
                    return overlay_pressed(entry, local);
                }
            }
        }

        let region = entry.router.classify(local, false);
        if region.is_caption() {
            match entry.window.begin_move() {
                Ok(()) => return (PointerOutcome::Consumed, None),
                Err(err) => tracing::debug!(%err, "runtime move refused"),
            }
        }
        (PointerOutcome::Passed(region), None)
    }

    fn pointer_moved(&self, entry: &mut DecoratedWindow, local: Point) -> PointerOutcome {
        overlay_moved(entry, local)
    }

    fn pointer_released(&self, entry: &mut DecoratedWindow) -> Option<ResizeLifecycle> {
        overlay_released(entry)
    }

    fn maximize(&self, _window: &dyn Window) -> bool {
        false
    }
}

struct OverlayStrategy;

impl DecorationStrategy for OverlayStrategy {
    fn mode(&self) -> DecorationMode {
        DecorationMode::None
    }

    fn attach(&self, _entry: &DecoratedWindow) {}

    fn detach(&self, entry: &mut DecoratedWindow) {
        entry.shape.clear(&*entry.window);
    }

    fn drives_overlay(&self) -> bool {
        true
    }

    fn pointer_pressed(
        &self,
        entry: &mut DecoratedWindow,
        local: Point,
    ) -> (PointerOutcome, Option<ResizeLifecycle>) {
        overlay_pressed(entry, local)
    }

    fn pointer_moved(&self, entry: &mut DecoratedWindow, local: Point) -> PointerOutcome {
        overlay_moved(entry, local)
    }

    fn pointer_released(&self, entry: &mut DecoratedWindow) -> Option<ResizeLifecycle> {
        overlay_released(entry)
    }

    fn maximize(&self, _window: &dyn Window) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────────────────────────────────────

/// Custom window decoration façade, owned by the UI thread
pub struct WindowDecorationProvider {
    config: DecorationConfig,
    strategy: Box<dyn DecorationStrategy>,
    windows: SlotMap<DecorationHandle, DecoratedWindow>,
    by_id: FxHashMap<WindowId, DecorationHandle>,
    resolver: MaximizedBoundsResolver,
    accent: AccentNotifier,
    accent_source: AccentColorSource,
    system_accent: Option<SystemAccent>,
    theme: ThemeVariant,
    accent_listeners: Vec<AccentListener>,
    resize_listeners: Vec<ResizeListener>,
}

impl WindowDecorationProvider {
    /// Provider in the process-wide detected mode
    pub fn new(config: DecorationConfig, env: &RuntimeEnvironment, caps: Capabilities) -> Self {
        let mode = detect_mode(&config, caps);
        Self::with_mode(config, env, mode)
    }

    /// Provider in an explicit mode. `NativeOsHook` without an installed
    /// hook degrades to `None`.
    pub fn with_mode(config: DecorationConfig, env: &RuntimeEnvironment, mode: DecorationMode) -> Self {
        let strategy: Box<dyn DecorationStrategy> = match mode {
            DecorationMode::NativeOsHook => match native_hook() {
                Some(hook) => Box::new(NativeHookStrategy { hook }),
                None => {
                    tracing::warn!("no native hook installed, using overlay decorations");
                    Box::new(OverlayStrategy)
                }
            },
            DecorationMode::RuntimeIntegrated => Box::new(RuntimeIntegratedStrategy),
            DecorationMode::None => Box::new(OverlayStrategy),
        };
        Self::build(config, env, strategy)
    }

    /// Native mode with a specific hook instead of the process-wide one
    pub fn with_native_hook(
        config: DecorationConfig,
        env: &RuntimeEnvironment,
        hook: Arc<dyn NativeHook>,
    ) -> Self {
        Self::build(config, env, Box::new(NativeHookStrategy { hook }))
    }

    fn build(config: DecorationConfig, env: &RuntimeEnvironment, strategy: Box<dyn DecorationStrategy>) -> Self {
        let native = strategy.mode() == DecorationMode::NativeOsHook;
        let resolver = MaximizedBoundsResolver::new(&config.quirk_table(), env, native);
        let accent = AccentNotifier::new(config.accent_debounce());
        strategy.watch_accent(&accent);
        let system_accent = strategy.system_accent();

        Self {
            accent_source: config.accent_source(),
            config,
            strategy,
            windows: SlotMap::with_key(),
            by_id: FxHashMap::default(),
            resolver,
            accent,
            system_accent,
            theme: ThemeVariant::default(),
            accent_listeners: Vec::new(),
            resize_listeners: Vec::new(),
        }
    }

    pub fn mode(&self) -> DecorationMode {
        self.strategy.mode()
    }

    pub fn config(&self) -> &DecorationConfig {
        &self.config
    }

    fn entry(&self, handle: DecorationHandle) -> Result<&DecoratedWindow> {
        self.windows.get(handle).ok_or(DecorError::UnknownWindow)
    }

    fn entry_mut(&mut self, handle: DecorationHandle) -> Result<&mut DecoratedWindow> {
        self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)
    }

    // ── Registration ────────────────────────────────────────────────────────

    /// Decorate a window. Registering the same window again updates its
    /// title bar info and returns the existing handle.
    pub fn register_window(
        &mut self,
        window: Arc<dyn Window>,
        title_bar_height: f32,
        spots: Vec<Rect>,
        app_icon: Option<Rect>,
    ) -> DecorationHandle {
        let info = HitTestInfo::new(title_bar_height, spots).with_app_icon(app_icon);
        self.register_window_with(window, info)
    }

    pub fn register_window_with(&mut self, window: Arc<dyn Window>, info: HitTestInfo) -> DecorationHandle {
        let id = window.id();
        if let Some(&handle) = self.by_id.get(&id) {
            if let Some(entry) = self.windows.get(handle) {
                entry.router.update(info);
                return handle;
            }
        }

        let mut entry = DecoratedWindow::new(window, info, &self.config);
        self.strategy.attach(&entry);
        entry.relayout(self.strategy.drives_overlay());

        let handle = self.windows.insert(entry);
        self.by_id.insert(id, handle);
        tracing::debug!(?id, mode = ?self.strategy.mode(), "window decorated");
        handle
    }

    pub fn unregister_window(&mut self, handle: DecorationHandle) -> Result<()> {
        let mut entry = self.windows.remove(handle).ok_or(DecorError::UnknownWindow)?;
        let id = entry.window.id();
        self.strategy.detach(&mut entry);
        self.by_id.remove(&id);
        self.resolver.forget(id);
        tracing::debug!(?id, "window decoration removed");
        Ok(())
    }

    pub fn handle_for(&self, id: WindowId) -> Option<DecorationHandle> {
        self.by_id.get(&id).copied()
    }

    pub fn window(&self, handle: DecorationHandle) -> Result<Arc<dyn Window>> {
        Ok(Arc::clone(&self.entry(handle)?.window))
    }

    // ── Hit testing ─────────────────────────────────────────────────────────

    /// Replace the interactive rectangles of a window's title bar
    pub fn update_hit_test_spots(&mut self, handle: DecorationHandle, spots: Vec<Rect>) -> Result<()> {
        self.entry(handle)?.router.update_spots(spots);
        Ok(())
    }

    /// Replace the whole title bar description
    pub fn update_title_bar(&mut self, handle: DecorationHandle, info: HitTestInfo) -> Result<()> {
        self.entry(handle)?.router.update(info);
        Ok(())
    }

    /// Router shared with native callback threads
    pub fn router(&self, handle: DecorationHandle) -> Result<Arc<HitTestRouter>> {
        Ok(Arc::clone(&self.entry(handle)?.router))
    }

    pub fn classify(&self, handle: DecorationHandle, pointer: Point, on_resize_border: bool) -> Result<Region> {
        Ok(self.entry(handle)?.router.classify(pointer, on_resize_border))
    }

    // ── Pointer input (logical, window-local) ───────────────────────────────

    pub fn pointer_pressed(&mut self, handle: DecorationHandle, pointer: Point) -> Result<PointerOutcome> {
        let entry = self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)?;
        let (outcome, lifecycle) = self.strategy.pointer_pressed(entry, pointer);
        if let Some(event) = lifecycle {
            self.fire_resize(handle, event);
        }
        Ok(outcome)
    }

    pub fn pointer_moved(&mut self, handle: DecorationHandle, pointer: Point) -> Result<PointerOutcome> {
        let entry = self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)?;
        Ok(self.strategy.pointer_moved(entry, pointer))
    }

    pub fn pointer_released(&mut self, handle: DecorationHandle) -> Result<()> {
        let entry = self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)?;
        if let Some(event) = self.strategy.pointer_released(entry) {
            self.fire_resize(handle, event);
        }
        Ok(())
    }

    /// Subscribe to resize gesture start/end
    pub fn on_resize(&mut self, listener: impl FnMut(DecorationHandle, ResizeLifecycle) + 'static) {
        self.resize_listeners.push(Box::new(listener));
    }

    fn fire_resize(&mut self, handle: DecorationHandle, event: ResizeLifecycle) {
        for listener in &mut self.resize_listeners {
            listener(handle, event);
        }
    }

    // ── Window lifecycle ────────────────────────────────────────────────────

    /// Window size or scale factor changed
    pub fn window_resized(&mut self, handle: DecorationHandle) -> Result<()> {
        let overlay = self.strategy.drives_overlay();
        self.entry_mut(handle)?.relayout(overlay);
        Ok(())
    }

    pub fn scale_factor_changed(&mut self, handle: DecorationHandle) -> Result<()> {
        self.window_resized(handle)
    }

    pub fn focus_changed(&mut self, handle: DecorationHandle, active: bool) -> Result<()> {
        let entry = self.entry_mut(handle)?;
        if entry.active != active {
            entry.active = active;
            entry.window.request_redraw();
        }
        Ok(())
    }

    /// Window maximize/fullscreen state changed
    ///
    /// A window maximized by other code (or the OS) before its maximized
    /// bounds were resolved gets them resolved now, and is re-maximized when
    /// they differ so the window manager applies them.
    pub fn window_state_changed(&mut self, handle: DecorationHandle) -> Result<()> {
        let overlay = self.strategy.drives_overlay();
        let native = self.strategy.mode() == DecorationMode::NativeOsHook;
        let entry = self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)?;

        let state = entry.window.state();
        let previous = entry.last_state;
        entry.last_state = state;
        entry.relayout(overlay);

        if state.is_maximized_both() && !previous.is_maximized_both() {
            if !native && !entry.maximized_bounds_up_to_date {
                let resolution = self.resolver.resolve(&*entry.window);
                entry.maximized_bounds_up_to_date = true;
                // re-maximizing only helps when the window manager got the bounds
                let applied = resolution.changed && apply_maximized_bounds(&*entry.window, &resolution.bounds);
                if resolution.toggle_maximize && applied {
                    tracing::debug!(bounds = ?resolution.bounds, "re-maximizing with corrected bounds");
                    entry.window.set_maximized(false);
                    entry.window.set_maximized(true);
                }
            }
        } else if !state.is_maximized_any() && previous.is_maximized_any() {
            entry.maximized_bounds_up_to_date = false;
        }
        Ok(())
    }

    /// Monitors were added, removed or rearranged
    pub fn monitors_changed(&mut self) {
        self.resolver.invalidate_all();
        let overlay = self.strategy.drives_overlay();
        for entry in self.windows.values_mut() {
            entry.maximized_bounds_up_to_date = false;
            entry.relayout(overlay);
        }
    }

    /// Maximize a window, resolving its maximized bounds first. Returns the
    /// bounds handed to the window, `None` when the OS maximizes natively.
    pub fn maximize(&mut self, handle: DecorationHandle) -> Result<Option<MaximizedBounds>> {
        let entry = self.windows.get_mut(handle).ok_or(DecorError::UnknownWindow)?;
        if self.strategy.maximize(&*entry.window) {
            return Ok(None);
        }

        let resolution = self.resolver.resolve(&*entry.window);
        apply_maximized_bounds(&*entry.window, &resolution.bounds);
        entry.maximized_bounds_up_to_date = true;
        entry.window.set_maximized(true);
        Ok(Some(resolution.bounds))
    }

    pub fn restore(&mut self, handle: DecorationHandle) -> Result<()> {
        let entry = self.entry_mut(handle)?;
        entry.maximized_bounds_up_to_date = false;
        entry.window.set_maximized(false);
        Ok(())
    }

    // ── Shape and border ────────────────────────────────────────────────────

    pub fn clip(&self, handle: DecorationHandle) -> Result<WindowClip> {
        Ok(self.entry(handle)?.shape.clip().clone())
    }

    pub fn set_theme(&mut self, theme: ThemeVariant) {
        if self.theme != theme {
            self.theme = theme;
            self.request_redraw_all();
        }
    }

    pub fn border_color(&self, handle: DecorationHandle) -> Result<Color> {
        let entry = self.entry(handle)?;
        Ok(border_color(
            self.accent_source,
            self.system_accent.as_ref(),
            self.theme,
            entry.active,
        ))
    }

    /// Paint a window's border in device pixels. Rounded corners are painted
    /// only where the window is actually shaped.
    pub fn paint_border(&mut self, handle: DecorationHandle, painter: &mut dyn BorderPainter) -> Result<()> {
        let color = self.border_color(handle)?;
        let overlay = self.strategy.drives_overlay();
        let entry = self.entry_mut(handle)?;
        let window = &*entry.window;
        entry.shape.paint_border(
            window.bounds().size,
            window.state(),
            window.scale_factor(),
            color,
            overlay,
            painter,
        );
        Ok(())
    }

    // ── Accent color ────────────────────────────────────────────────────────

    /// Notifier for platform threads reporting OS accent changes
    pub fn accent_notifier(&self) -> AccentNotifier {
        self.accent.clone()
    }

    /// Subscribe to debounced accent changes
    pub fn on_accent_changed(&mut self, listener: impl FnMut(&AccentChange) + 'static) {
        self.accent_listeners.push(Box::new(listener));
    }

    /// Update OS accent settings read by the platform layer
    pub fn set_system_accent(&mut self, accent: Option<SystemAccent>) {
        self.system_accent = accent;
    }

    /// Deliver a due accent notification. Call from the UI thread's event
    /// loop; returns when to call again.
    pub fn poll_accent(&mut self, now: Instant) -> Option<Instant> {
        if self.accent.poll(now) {
            if let Some(accent) = self.strategy.system_accent() {
                self.system_accent = Some(accent);
            }
            tracing::debug!(accent = ?self.system_accent, "accent color changed");

            let change = AccentChange {
                system: self.system_accent,
            };
            self.request_redraw_all();
            for listener in &mut self.accent_listeners {
                listener(&change);
            }
        }
        self.accent.next_deadline()
    }

    fn request_redraw_all(&self) {
        for entry in self.windows.values() {
            entry.window.request_redraw();
        }
    }
}
