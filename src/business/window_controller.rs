//! Window Controller
//!
//! Explicit state machine for the popup (`Hidden`/`Visible`) and the
//! settings window (`Closed`/`Open`). The actual windows live behind the
//! [`WindowShell`] trait so transitions are testable without a GUI; the
//! Tauri shell provides the production implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::platform::{FocusTracker, FrontmostApp};

/// Popup size, matching the original 600x500 window.
pub const POPUP_WIDTH: f64 = 600.0;
pub const POPUP_HEIGHT: f64 = 500.0;

/// Where the popup goes when no display information is available.
const FALLBACK_POSITION: (f64, f64) = (200.0, 120.0);

/// Delay before handing focus back, so the hide settles first.
const FOCUS_RESTORE_DELAY: Duration = Duration::from_millis(150);

/// Upper bound on the frontmost-application query; expiry means "unknown".
const FRONTMOST_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsState {
    Closed,
    Open,
}

/// Window geometry in logical pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The concrete windows, owned by the application shell.
///
/// `show_popup` is expected to make the window visible, give it input
/// focus, and signal the UI to reset its input field. `open_settings`
/// centers the settings window on the primary display.
pub trait WindowShell: Send + Sync {
    fn show_popup(&self, bounds: Rect);
    fn focus_popup(&self);
    fn hide_popup(&self);
    fn open_settings(&self);
    fn focus_settings(&self);
    fn close_settings(&self);
    /// Work area of the display nearest the pointer, if known.
    fn display_near_pointer(&self) -> Option<Rect>;
}

/// Owns the two window state machines. At most one popup and one settings
/// window exist; duplicate show/open requests refocus instead of creating.
pub struct WindowController {
    shell: Arc<dyn WindowShell>,
    focus: Arc<dyn FocusTracker>,
    popup: Mutex<PopupState>,
    settings: Mutex<SettingsState>,
    previous_app: Mutex<Option<FrontmostApp>>,
}

impl WindowController {
    pub fn new(shell: Arc<dyn WindowShell>, focus: Arc<dyn FocusTracker>) -> Self {
        Self {
            shell,
            focus,
            popup: Mutex::new(PopupState::Hidden),
            settings: Mutex::new(SettingsState::Closed),
            previous_app: Mutex::new(None),
        }
    }

    pub fn popup_state(&self) -> PopupState {
        *self.popup.lock().expect("popup lock poisoned")
    }

    pub fn settings_state(&self) -> SettingsState {
        *self.settings.lock().expect("settings lock poisoned")
    }

    /// `Hidden -> Visible`. Captures the frontmost application (best
    /// effort), positions the popup, then shows and focuses it. Showing
    /// while already visible just refocuses.
    pub async fn show_popup(&self) {
        {
            let mut state = self.popup.lock().expect("popup lock poisoned");
            if *state == PopupState::Visible {
                self.shell.focus_popup();
                return;
            }
            *state = PopupState::Visible;
        }

        let captured = self.capture_frontmost().await;

        // A hide may have won while the capture ran; the window must then
        // stay hidden and the capture is discarded.
        let state = self.popup.lock().expect("popup lock poisoned");
        if *state != PopupState::Visible {
            return;
        }
        if let Some(app) = &captured {
            tracing::debug!("Captured frontmost application: {}", app.name);
        }
        *self.previous_app.lock().expect("previous app lock poisoned") = captured;

        self.shell.show_popup(self.popup_bounds());
    }

    /// `Visible -> Hidden`. Hides the popup and, if a previous application
    /// was captured, asks the OS to hand focus back after a short delay.
    /// The capture is cleared whether or not the restore works.
    pub async fn hide_popup(&self) {
        {
            let mut state = self.popup.lock().expect("popup lock poisoned");
            if *state == PopupState::Hidden {
                return;
            }
            *state = PopupState::Hidden;
        }

        self.shell.hide_popup();

        let previous = self
            .previous_app
            .lock()
            .expect("previous app lock poisoned")
            .take();
        if let Some(app) = previous {
            tokio::time::sleep(FOCUS_RESTORE_DELAY).await;
            let focus = self.focus.clone();
            let name = app.name.clone();
            let restored = tokio::task::spawn_blocking(move || focus.restore_focus(&app))
                .await
                .unwrap_or(false);
            if !restored {
                tracing::debug!("Could not restore focus to {}", name);
            }
        }
    }

    pub async fn toggle_popup(&self) {
        match self.popup_state() {
            PopupState::Hidden => self.show_popup().await,
            PopupState::Visible => self.hide_popup().await,
        }
    }

    /// `Closed -> Open`. The settings window is a singleton; opening while
    /// already open refocuses the existing window. Opening hides the popup
    /// without running its focus-restore side effect.
    pub async fn open_settings(&self) {
        {
            let mut state = self.settings.lock().expect("settings lock poisoned");
            if *state == SettingsState::Open {
                self.shell.focus_settings();
                return;
            }
            *state = SettingsState::Open;
        }

        {
            let mut popup = self.popup.lock().expect("popup lock poisoned");
            if *popup == PopupState::Visible {
                *popup = PopupState::Hidden;
                self.shell.hide_popup();
                // Settings takes the focus; drop the capture.
                self.previous_app
                    .lock()
                    .expect("previous app lock poisoned")
                    .take();
            }
        }

        self.shell.open_settings();
    }

    pub async fn close_settings(&self) {
        let mut state = self.settings.lock().expect("settings lock poisoned");
        if *state == SettingsState::Closed {
            return;
        }
        *state = SettingsState::Closed;
        self.shell.close_settings();
    }

    async fn capture_frontmost(&self) -> Option<FrontmostApp> {
        let focus = self.focus.clone();
        let query = tokio::task::spawn_blocking(move || focus.frontmost_app());
        match tokio::time::timeout(FRONTMOST_QUERY_TIMEOUT, query).await {
            Ok(Ok(app)) => app,
            Ok(Err(err)) => {
                tracing::debug!("Frontmost application query failed: {}", err);
                None
            }
            Err(_) => {
                tracing::debug!("Frontmost application query timed out");
                None
            }
        }
    }

    /// Centered horizontally, one sixth of the screen height from the top,
    /// on the display nearest the pointer. Fixed position when no display
    /// information is available.
    fn popup_bounds(&self) -> Rect {
        match self.shell.display_near_pointer() {
            Some(area) => Rect {
                x: area.x + (area.width - POPUP_WIDTH) / 2.0,
                y: area.y + area.height / 6.0,
                width: POPUP_WIDTH,
                height: POPUP_HEIGHT,
            },
            None => Rect {
                x: FALLBACK_POSITION.0,
                y: FALLBACK_POSITION.1,
                width: POPUP_WIDTH,
                height: POPUP_HEIGHT,
            },
        }
    }
}
