//! Desktop event loop with custom window decorations
//!
//! Routes winit window events through a [`WindowDecorationProvider`] before
//! the application sees them. Pointer events the decorations consume (resize
//! drags, caption moves) never reach the handler.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::native;
use crate::window::DesktopWindow;
use casement_core::{Point, Size};
use casement_decor::{
    Capabilities, DecorationConfig, DecorationHandle, DecorError, HitTestInfo, NativeHook,
    PointerOutcome, Region, WindowDecorationProvider,
};
use casement_platform::{
    OsFamily, PlatformError, RuntimeEnvironment, RuntimeVersion, Window, WindowConfig,
};
use parking_lot::Mutex;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent as WinitWindowEvent};
use winit::event_loop::{
    ActiveEventLoop, ControlFlow as WinitControlFlow, EventLoop as WinitEventLoop, EventLoopProxy,
};
use winit::window::WindowId;

/// winit release the quirk table is keyed on
pub const WINIT_VERSION: [u32; 3] = [0, 30, 0];

/// Runtime environment of this back end
pub fn runtime_environment() -> RuntimeEnvironment {
    RuntimeEnvironment::new(OsFamily::current(), RuntimeVersion::new("winit", WINIT_VERSION))
}

/// What winit offers on this platform
///
/// `drag_resize_window` is refused on macOS; the decoration provider falls
/// back to overlay resizing there.
pub fn capabilities(hook: Option<&Arc<dyn NativeHook>>) -> Capabilities {
    Capabilities {
        native_os_supported: cfg!(target_os = "windows") && hook.is_some(),
        runtime_move_resize: true,
    }
}

/// Control flow returned by the application handler
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    #[default]
    Continue,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Moved,
    Pressed(MouseButton),
    Released(MouseButton),
}

/// Events delivered to the application
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DesktopEvent {
    /// Window created and decorated
    Ready,
    /// Pointer event the decorations passed through, in logical window
    /// coordinates
    Pointer {
        kind: PointerKind,
        position: Point,
        region: Region,
    },
    Resized(Size),
    /// Window needs repainting
    Frame,
    /// Border color may have changed
    AccentChanged,
    CloseRequested,
}

/// What the handler gets alongside each event
pub struct DesktopContext<'a> {
    pub window: &'a DesktopWindow,
    pub decorations: &'a mut WindowDecorationProvider,
    pub handle: DecorationHandle,
}

/// Proxy for waking up the event loop from another thread
#[derive(Clone)]
pub struct WakeProxy {
    proxy: EventLoopProxy<()>,
}

impl WakeProxy {
    /// Wake up the event loop so it re-evaluates pending deadlines
    pub fn wake(&self) {
        // Ignore errors (e.g., if event loop has exited)
        let _ = self.proxy.send_event(());
    }
}

/// Desktop event loop wrapping winit's event loop
pub struct DecoratedEventLoop {
    event_loop: WinitEventLoop<()>,
    window_config: WindowConfig,
    decorations: WindowDecorationProvider,
    title_bar: HitTestInfo,
    wake_proxy: WakeProxy,
}

impl DecoratedEventLoop {
    /// Create the event loop and pick the decoration mode
    pub fn new(
        window_config: WindowConfig,
        decor_config: DecorationConfig,
        title_bar: HitTestInfo,
    ) -> Result<Self, PlatformError> {
        let event_loop = {
            let mut builder = WinitEventLoop::builder();

            #[cfg(target_os = "macos")]
            {
                use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
                builder.with_activation_policy(ActivationPolicy::Regular);
            }

            builder
                .build()
                .map_err(|e| PlatformError::Other(e.to_string()))?
        };

        let wake_proxy = WakeProxy {
            proxy: event_loop.create_proxy(),
        };

        let hook = native::install_platform_hook();
        let decorations =
            WindowDecorationProvider::new(decor_config, &runtime_environment(), capabilities(hook.as_ref()));
        tracing::info!(mode = ?decorations.mode(), "window decorations ready");

        // the proxy is Send but not Sync on every platform
        let waker = Mutex::new(wake_proxy.clone());
        decorations
            .accent_notifier()
            .set_waker(move || waker.lock().wake());

        Ok(Self {
            event_loop,
            window_config,
            decorations,
            title_bar,
            wake_proxy,
        })
    }

    /// Get a wake proxy that can be used to wake up the event loop from another thread
    pub fn wake_proxy(&self) -> WakeProxy {
        self.wake_proxy.clone()
    }

    pub fn decorations(&self) -> &WindowDecorationProvider {
        &self.decorations
    }

    /// Run until the handler returns [`ControlFlow::Exit`]
    pub fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(DesktopEvent, &mut DesktopContext<'_>) -> ControlFlow + 'static,
    {
        let mut app = DesktopApp::new(self.window_config, self.decorations, self.title_bar, handler);
        self.event_loop
            .run_app(&mut app)
            .map_err(|e| PlatformError::Other(e.to_string()))
    }
}

fn log_failure(result: Result<(), DecorError>, action: &str) {
    if let Err(err) = result {
        tracing::warn!(%err, action, "decoration update failed");
    }
}

/// Internal winit application handler
struct DesktopApp<F>
where
    F: FnMut(DesktopEvent, &mut DesktopContext<'_>) -> ControlFlow,
{
    window_config: WindowConfig,
    decorations: WindowDecorationProvider,
    title_bar: HitTestInfo,
    window: Option<(Arc<DesktopWindow>, DecorationHandle)>,
    handler: F,
    cursor: Point,
    accent_changed: Rc<Cell<bool>>,
    should_exit: bool,
}

impl<F> DesktopApp<F>
where
    F: FnMut(DesktopEvent, &mut DesktopContext<'_>) -> ControlFlow,
{
    fn new(
        window_config: WindowConfig,
        mut decorations: WindowDecorationProvider,
        title_bar: HitTestInfo,
        handler: F,
    ) -> Self {
        let accent_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&accent_changed);
        decorations.on_accent_changed(move |_| flag.set(true));

        Self {
            window_config,
            decorations,
            title_bar,
            window: None,
            handler,
            cursor: Point::ZERO,
            accent_changed,
            should_exit: false,
        }
    }

    fn handle_event(&mut self, event: DesktopEvent) {
        if let Some((window, handle)) = &self.window {
            let mut context = DesktopContext {
                window,
                decorations: &mut self.decorations,
                handle: *handle,
            };
            if (self.handler)(event, &mut context) == ControlFlow::Exit {
                self.should_exit = true;
            }
        }
    }

    fn pointer(&mut self, kind: PointerKind, outcome: Result<PointerOutcome, DecorError>) {
        match outcome {
            Ok(PointerOutcome::Passed(region)) => self.handle_event(DesktopEvent::Pointer {
                kind,
                position: self.cursor,
                region,
            }),
            Ok(PointerOutcome::Consumed) => {}
            Err(err) => tracing::warn!(%err, "pointer routing failed"),
        }
    }

    fn classify(&self, handle: DecorationHandle) -> Result<PointerOutcome, DecorError> {
        self.decorations
            .classify(handle, self.cursor, false)
            .map(PointerOutcome::Passed)
    }
}

impl<F> ApplicationHandler for DesktopApp<F>
where
    F: FnMut(DesktopEvent, &mut DesktopContext<'_>) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Create window if we don't have one
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.window_config) {
                Ok(window) => {
                    let window = Arc::new(window);
                    let as_dyn: Arc<dyn Window> = window.clone();
                    let handle = self
                        .decorations
                        .register_window_with(as_dyn, self.title_bar.clone());
                    self.window = Some((window, handle));
                    self.handle_event(DesktopEvent::Ready);
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        let Some((window, handle)) = self.window.clone() else {
            return;
        };

        match event {
            WinitWindowEvent::CloseRequested => {
                self.handle_event(DesktopEvent::CloseRequested);
                if self.should_exit {
                    log_failure(self.decorations.unregister_window(handle), "unregister");
                }
            }

            WinitWindowEvent::Resized(size) => {
                log_failure(self.decorations.window_resized(handle), "resize");
                log_failure(self.decorations.window_state_changed(handle), "state");
                let logical = size.to_logical::<f32>(window.scale_factor());
                self.handle_event(DesktopEvent::Resized(Size::new(logical.width, logical.height)));
            }

            WinitWindowEvent::ScaleFactorChanged { .. } => {
                log_failure(self.decorations.scale_factor_changed(handle), "scale factor");
            }

            WinitWindowEvent::Focused(focused) => {
                window.set_focused(focused);
                log_failure(self.decorations.focus_changed(handle, focused), "focus");
            }

            WinitWindowEvent::RedrawRequested => {
                self.handle_event(DesktopEvent::Frame);
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.cursor = Point::new(logical.x, logical.y);
                let outcome = self.decorations.pointer_moved(handle, self.cursor);
                self.pointer(PointerKind::Moved, outcome);
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                let outcome = match (state, button) {
                    (ElementState::Pressed, MouseButton::Left) => {
                        self.decorations.pointer_pressed(handle, self.cursor)
                    }
                    (ElementState::Released, MouseButton::Left) => self
                        .decorations
                        .pointer_released(handle)
                        .and_then(|()| self.classify(handle)),
                    _ => self.classify(handle),
                };
                let kind = match state {
                    ElementState::Pressed => PointerKind::Pressed(button),
                    ElementState::Released => PointerKind::Released(button),
                };
                self.pointer(kind, outcome);
            }

            _ => {}
        }

        // Check for exit
        if self.should_exit {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let next = self.decorations.poll_accent(Instant::now());
        if self.accent_changed.replace(false) {
            self.handle_event(DesktopEvent::AccentChanged);
        }

        if let Some(deadline) = next {
            event_loop.set_control_flow(WinitControlFlow::WaitUntil(deadline));
        } else {
            event_loop.set_control_flow(WinitControlFlow::Wait);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: ()) {
        // accent wake-up; about_to_wait picks up the new deadline
    }
}
