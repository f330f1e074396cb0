//! Casement Desktop Platform
//!
//! winit windows for macOS, Windows and Linux driven by `casement_decor`.
//! On Windows a native hit-test hook lets the OS handle caption drags,
//! resizing and snapping; elsewhere winit's interactive move/resize or the
//! overlay fallback take over.

pub mod event_loop;
pub mod native;
pub mod window;

pub use event_loop::{
    capabilities, runtime_environment, ControlFlow, DecoratedEventLoop, DesktopContext,
    DesktopEvent, PointerKind, WakeProxy, WINIT_VERSION,
};
pub use native::install_platform_hook;
pub use window::DesktopWindow;
