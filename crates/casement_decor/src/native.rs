//! Process-wide native hit-test hook
//!
//! A platform back end that can answer the OS's hit-test queries itself
//! installs one [`NativeHook`] at startup. It is set once and never replaced;
//! a second install is an error.

use std::sync::{Arc, OnceLock};

use casement_platform::{PlatformError, Window, WindowId};

use crate::accent::{AccentNotifier, SystemAccent};
use crate::error::{DecorError, Result};
use crate::hit_test::HitTestRouter;

/// Native window-message hook supplied by a platform back end
///
/// `install` subclasses the window so that every OS hit-test query is
/// answered from `router` on whatever thread the OS calls in on.
pub trait NativeHook: Send + Sync {
    fn name(&self) -> &str;

    /// OS version and library checks
    fn is_supported(&self) -> bool;

    fn install(
        &self,
        window: &dyn Window,
        router: Arc<HitTestRouter>,
    ) -> std::result::Result<(), PlatformError>;

    fn uninstall(&self, window: WindowId);

    /// Maximize through the OS so it applies its own work area. Returns
    /// `false` when the hook cannot do it for this window.
    fn maximize(&self, _window: WindowId) -> bool {
        false
    }

    /// Start forwarding OS accent-color change notifications
    fn watch_accent(&self, _notifier: AccentNotifier) {}

    /// Current OS accent settings
    fn system_accent(&self) -> Option<SystemAccent> {
        None
    }
}

static NATIVE_HOOK: OnceLock<Arc<dyn NativeHook>> = OnceLock::new();

/// Install the process-wide native hook (call once at startup)
pub fn install_native_hook(hook: Arc<dyn NativeHook>) -> Result<()> {
    let name = hook.name().to_string();
    NATIVE_HOOK
        .set(hook)
        .map_err(|_| DecorError::AlreadyInitialized("native hook"))?;
    tracing::debug!(hook = %name, "native decoration hook installed");
    Ok(())
}

/// The installed native hook, if any
pub fn native_hook() -> Option<Arc<dyn NativeHook>> {
    NATIVE_HOOK.get().cloned()
}
