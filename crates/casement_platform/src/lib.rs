//! Casement Platform Abstraction
//!
//! The contract a windowing back end satisfies so the decoration layer can
//! drive it: live window geometry and state, monitor metadata, cursors,
//! window shaping, and hand-off of interactive move/resize to the window
//! manager.
//!
//! Nothing here talks to an OS. See `casement_platform_desktop` for the winit
//! implementation.

pub mod error;
pub mod monitor;
pub mod window;

pub use error::{PlatformError, Result};
pub use monitor::{MonitorInfo, OsFamily, RuntimeEnvironment, RuntimeVersion, ScaleTransform};
pub use window::{Cursor, ResizeDirection, Window, WindowConfig, WindowId, WindowState};
