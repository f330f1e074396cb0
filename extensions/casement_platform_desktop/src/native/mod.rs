//! OS-specific window message hooks

#[cfg(target_os = "windows")]
pub mod windows;

use std::sync::Arc;

#[cfg(target_os = "windows")]
use casement_decor::install_native_hook;
use casement_decor::{native_hook, NativeHook};

/// Install this platform's native hit-test hook, if it has one
///
/// Safe to call more than once; an already installed hook is kept.
pub fn install_platform_hook() -> Option<Arc<dyn NativeHook>> {
    if let Some(hook) = native_hook() {
        return Some(hook);
    }

    #[cfg(target_os = "windows")]
    {
        let hook: Arc<dyn NativeHook> = Arc::new(windows::WindowsHook);
        if let Err(err) = install_native_hook(hook) {
            // lost a race with another installer
            tracing::debug!(%err, "native hook already present");
        }
    }

    native_hook()
}
