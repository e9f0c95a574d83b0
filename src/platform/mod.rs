//! Platform integration.
//!
//! The only platform-specific capability the core needs is capturing the
//! frontmost application before the popup steals focus, and handing focus
//! back afterwards. Everything else (windows, tray) belongs to the shell.

/// The application that was frontmost before the popup appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmostApp {
    pub name: String,
    pub pid: i32,
}

/// Trait for querying and restoring application focus.
pub trait FocusTracker: Send + Sync {
    /// Best-effort query; `None` means "no previous app".
    fn frontmost_app(&self) -> Option<FrontmostApp>;
    /// Ask the OS to bring `app` back to the front. Returns whether the
    /// request was accepted; failure is not an error condition.
    fn restore_focus(&self, app: &FrontmostApp) -> bool;
}

#[cfg(target_os = "macos")]
pub mod macos;

/// Tracker for hosts without a supported implementation.
pub struct NullFocusTracker;

impl FocusTracker for NullFocusTracker {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        None
    }

    fn restore_focus(&self, _app: &FrontmostApp) -> bool {
        false
    }
}

/// Factory for creating platform-specific implementations
pub struct PlatformFactory;

impl PlatformFactory {
    pub fn create_focus_tracker() -> Box<dyn FocusTracker> {
        #[cfg(target_os = "macos")]
        return Box::new(macos::MacosFocusTracker::new());
        #[cfg(not(target_os = "macos"))]
        Box::new(NullFocusTracker)
    }
}

/// Whether this host can run the full menu-bar session. The CLI mode runs
/// anywhere; windows, tray, and hotkeys are macOS only.
pub fn session_supported() -> bool {
    cfg!(target_os = "macos")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tracker_reports_nothing() {
        let tracker = NullFocusTracker;
        assert_eq!(tracker.frontmost_app(), None);
        assert!(!tracker.restore_focus(&FrontmostApp {
            name: "x".into(),
            pid: 1
        }));
    }
}
