//! Casement Window Decorations
//!
//! Custom title bars and borders for undecorated top-level windows, with the
//! native behavior users expect kept intact:
//!
//! - **Hit testing**: [`HitTestRouter`] answers "what is under this point"
//!   from any thread, so OS hooks can call in without touching the UI thread
//! - **Border resizing**: [`DragResizeEngine`] emulates resize handles where
//!   the OS does not provide them
//! - **Maximized bounds**: [`MaximizedBoundsResolver`] works out the monitor
//!   work area, correcting for runtime scaling quirks
//! - **Window shape**: [`WindowShapeManager`] clips restored windows to a
//!   rounded rectangle and paints the border
//! - **Accent borders**: [`AccentNotifier`] coalesces OS accent changes
//!
//! # Example
//!
//! ```ignore
//! use casement_decor::prelude::*;
//!
//! let config = DecorationConfig::default().with_env_overrides()?;
//! let mut decorations = WindowDecorationProvider::new(config, &env, caps);
//! let handle = decorations.register_window(window, 32.0, spots, None);
//!
//! match decorations.pointer_pressed(handle, pointer)? {
//!     PointerOutcome::Consumed => {}
//!     PointerOutcome::Passed(region) => dispatch_to_widgets(region),
//! }
//! ```

pub mod accent;
pub mod config;
pub mod error;
pub mod maximize;
pub mod native;
pub mod provider;
pub mod resize;
pub mod shape;
pub mod title_bar;

pub use accent::{
    blend_colorization, border_color, AccentColorSource, AccentNotifier, BorderColors,
    SystemAccent, ThemeVariant, ACCENT_DEBOUNCE,
};
pub use config::{DecorationConfig, ForcedMode};
pub use error::{DecorError, Result};
pub use hit_test::{HitTestInfo, HitTestRouter, Region, WindowButtons};
pub use maximize::{
    BoundsCorrection, MaximizedBounds, MaximizedBoundsResolver, QuirkRule, QuirkTable, Resolution,
};
pub use native::{install_native_hook, native_hook, NativeHook};
pub use provider::{
    detect_mode, probe_mode, AccentChange, Capabilities, DecorationHandle, DecorationMode,
    PointerOutcome, WindowDecorationProvider,
};
pub use resize::{
    DragResizeEngine, HandleMetrics, MinimumSizePolicy, ResizeHandles, ResizeLifecycle,
    FALLBACK_MINIMUM_SIZE,
};
pub use shape::{BorderPainter, CornerMask, WindowClip, WindowShapeManager};
pub use title_bar::{LayoutDirection, TitleBarSpots};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        AccentChange, Capabilities, DecorationConfig, DecorationHandle, DecorationMode,
        HitTestInfo, PointerOutcome, Region, TitleBarSpots, WindowDecorationProvider,
    };
}
