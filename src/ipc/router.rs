//! Dispatches UI requests to the owning components.
//!
//! All input validation for spell checks happens here, before the
//! dictionary is consulted. External-call failures (clipboard, hotkey
//! registration) are converted into typed results; nothing in this module
//! can take the process down.

use std::sync::{Arc, Mutex};

use crate::business::{HotkeyBinding, HotkeyManager, SoundCue, SoundPlayer, WindowController};
use crate::data::{AppConfig, ConfigStore};
use crate::ipc::{IpcRequest, IpcResponse};
use crate::spell::{SpellCheckResult, SpellChecker};

pub struct Router {
    checker: Arc<SpellChecker>,
    store: ConfigStore,
    hotkeys: Arc<HotkeyManager>,
    sound: Arc<dyn SoundPlayer>,
    windows: Arc<WindowController>,
    config: Mutex<AppConfig>,
}

impl Router {
    pub fn new(
        checker: Arc<SpellChecker>,
        store: ConfigStore,
        hotkeys: Arc<HotkeyManager>,
        sound: Arc<dyn SoundPlayer>,
        windows: Arc<WindowController>,
    ) -> Self {
        let config = store.load();
        Self {
            checker,
            store,
            hotkeys,
            sound,
            windows,
            config: Mutex::new(config),
        }
    }

    pub fn settings(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    pub fn windows(&self) -> &Arc<WindowController> {
        &self.windows
    }

    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::SpellCheck { word } => IpcResponse::SpellCheck {
                result: self.spell_check(&word),
            },
            IpcRequest::GetClipboard => IpcResponse::Clipboard {
                text: read_clipboard(),
            },
            IpcRequest::SetClipboard { text } => IpcResponse::ClipboardWritten {
                ok: write_clipboard(&text),
            },
            IpcRequest::HideWindow => {
                self.windows.hide_popup().await;
                IpcResponse::Ack
            }
            IpcRequest::GetSettings => IpcResponse::Settings {
                settings: self.settings(),
            },
            IpcRequest::UpdateHotkey { binding } => self.update_hotkey(&binding),
            IpcRequest::UpdateSoundSetting { enabled } => {
                self.update_sound_setting(enabled);
                IpcResponse::Ack
            }
            IpcRequest::OpenSettings => {
                self.windows.open_settings().await;
                IpcResponse::Ack
            }
            IpcRequest::CloseSettings => {
                self.windows.close_settings().await;
                IpcResponse::Ack
            }
        }
    }

    /// Validate and check a word. Empty and multi-word input is rejected
    /// here with a user-facing message; the dictionary never sees it.
    pub fn spell_check(&self, word: &str) -> SpellCheckResult {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return SpellCheckResult::rejected(trimmed, "Please enter a word to check");
        }
        if trimmed.split_whitespace().count() > 1 {
            return SpellCheckResult::rejected(trimmed, "Please enter only one word at a time");
        }

        let result = self.checker.check(trimmed);
        if result.error.is_none() && self.settings().sound_enabled {
            let cue = if result.is_correct {
                SoundCue::Correct
            } else {
                SoundCue::Incorrect
            };
            self.sound.play(cue);
        }
        result
    }

    fn update_hotkey(&self, binding: &str) -> IpcResponse {
        let parsed: HotkeyBinding = match binding.parse() {
            Ok(parsed) => parsed,
            Err(err) => {
                return IpcResponse::HotkeyUpdated {
                    ok: false,
                    hotkey: self.settings().hotkey,
                    error: Some(err.to_string()),
                }
            }
        };

        // Hand the in-memory config down so persistence never re-reads a
        // file an earlier background save may not have reached yet.
        match self.hotkeys.update(&parsed, &self.store, self.settings()) {
            Ok(()) => {
                let hotkey = parsed.to_string();
                self.config.lock().expect("config lock poisoned").hotkey = hotkey.clone();
                IpcResponse::HotkeyUpdated {
                    ok: true,
                    hotkey,
                    error: None,
                }
            }
            Err(err) => IpcResponse::HotkeyUpdated {
                ok: false,
                hotkey: self.settings().hotkey,
                error: Some(err.to_string()),
            },
        }
    }

    fn update_sound_setting(&self, enabled: bool) {
        let config = {
            let mut config = self.config.lock().expect("config lock poisoned");
            config.sound_enabled = enabled;
            config.clone()
        };
        self.store.save_in_background(config);
    }
}

fn read_clipboard() -> String {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            tracing::debug!("Clipboard read failed: {}", err);
            String::new()
        }
    }
}

fn write_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!("Clipboard write failed: {}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::hotkey_manager::{HotkeyError, ShortcutRegistrar};
    use crate::business::window_controller::{Rect, WindowShell};
    use crate::business::NullPlayer;
    use crate::platform::NullFocusTracker;

    struct NullShell;

    impl WindowShell for NullShell {
        fn show_popup(&self, _bounds: Rect) {}
        fn focus_popup(&self) {}
        fn hide_popup(&self) {}
        fn open_settings(&self) {}
        fn focus_settings(&self) {}
        fn close_settings(&self) {}
        fn display_near_pointer(&self) -> Option<Rect> {
            None
        }
    }

    struct AcceptAllRegistrar;

    impl ShortcutRegistrar for AcceptAllRegistrar {
        fn register(&self, _binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            Ok(())
        }
        fn unregister(&self, _binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            Ok(())
        }
    }

    struct RejectAllRegistrar;

    impl ShortcutRegistrar for RejectAllRegistrar {
        fn register(&self, _binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            Err(HotkeyError::Registration("denied".into()))
        }
        fn unregister(&self, _binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            Ok(())
        }
    }

    fn router_with(registrar: Box<dyn ShortcutRegistrar>) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("settings.json"));
        let checker = Arc::new(
            SpellChecker::from_strings(
                "SET UTF-8\nTRY esianrtolcdugmphbyfvkwz\n",
                "3\nthe\nword\nspell\n",
            )
            .unwrap(),
        );
        let windows = Arc::new(WindowController::new(
            Arc::new(NullShell),
            Arc::new(NullFocusTracker),
        ));
        let router = Router::new(
            checker,
            store,
            Arc::new(HotkeyManager::new(registrar)),
            Arc::new(NullPlayer),
            windows,
        );
        (dir, router)
    }

    #[test]
    fn multi_word_input_is_rejected_before_the_dictionary() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let result = router.spell_check("two words");
        assert!(!result.is_correct);
        assert_eq!(
            result.error.as_deref(),
            Some("Please enter only one word at a time")
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let result = router.spell_check("   ");
        assert_eq!(result.error.as_deref(), Some("Please enter a word to check"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let result = router.spell_check("  the  ");
        assert!(result.is_correct);
        assert_eq!(result.word, "the");
    }

    #[tokio::test]
    async fn update_hotkey_rejects_invalid_binding() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let response = router
            .handle(IpcRequest::UpdateHotkey {
                binding: "O".to_string(),
            })
            .await;
        match response {
            IpcResponse::HotkeyUpdated { ok, hotkey, error } => {
                assert!(!ok);
                assert_eq!(hotkey, crate::data::DEFAULT_HOTKEY);
                assert!(error.is_some());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_hotkey_adopts_valid_binding() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let response = router
            .handle(IpcRequest::UpdateHotkey {
                binding: "Shift+Command+L".to_string(),
            })
            .await;
        assert_eq!(
            response,
            IpcResponse::HotkeyUpdated {
                ok: true,
                hotkey: "Shift+Command+L".to_string(),
                error: None,
            }
        );
        assert_eq!(router.settings().hotkey, "Shift+Command+L");
    }

    #[tokio::test]
    async fn failed_registration_keeps_previous_setting() {
        let (_dir, router) = router_with(Box::new(RejectAllRegistrar));
        let response = router
            .handle(IpcRequest::UpdateHotkey {
                binding: "Shift+Command+L".to_string(),
            })
            .await;
        match response {
            IpcResponse::HotkeyUpdated { ok, hotkey, .. } => {
                assert!(!ok);
                assert_eq!(hotkey, crate::data::DEFAULT_HOTKEY);
            }
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(router.settings().hotkey, crate::data::DEFAULT_HOTKEY);
    }

    #[tokio::test]
    async fn sound_setting_is_persisted() {
        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        let response = router
            .handle(IpcRequest::UpdateSoundSetting { enabled: false })
            .await;
        assert_eq!(response, IpcResponse::Ack);
        assert!(!router.settings().sound_enabled);
    }

    #[tokio::test]
    async fn window_requests_drive_the_state_machine() {
        use crate::business::{PopupState, SettingsState};

        let (_dir, router) = router_with(Box::new(AcceptAllRegistrar));
        router.handle(IpcRequest::OpenSettings).await;
        assert_eq!(router.windows().settings_state(), SettingsState::Open);
        router.handle(IpcRequest::CloseSettings).await;
        assert_eq!(router.windows().settings_state(), SettingsState::Closed);
        router.handle(IpcRequest::HideWindow).await;
        assert_eq!(router.windows().popup_state(), PopupState::Hidden);
    }
}
