//! Hotkey Manager
//!
//! Owns the single process-wide global shortcut. The OS registration sits
//! behind a trait so the register/rollback sequence is testable without
//! touching real OS state. Invariant: a failed update never leaves the
//! shortcut unbound; the previous binding is re-registered.

use std::sync::Mutex;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::GlobalHotKeyManager;

use crate::business::hotkey::{HotkeyBinding, Modifier};
use crate::data::{AppConfig, ConfigStore};

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("failed to register hotkey: {0}")]
    Registration(String),
    #[error("hotkey has no terminal key; the OS cannot register it")]
    ModifierOnly,
}

/// OS-level shortcut registration.
pub trait ShortcutRegistrar: Send + Sync {
    fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError>;
    fn unregister(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError>;
}

/// Production registrar backed by the `global-hotkey` crate.
pub struct GlobalShortcutRegistrar {
    manager: GlobalHotKeyManager,
}

impl GlobalShortcutRegistrar {
    /// Must be created on the main thread on macOS.
    pub fn new() -> anyhow::Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|err| anyhow::anyhow!("failed to initialize hotkey manager: {}", err))?;
        Ok(Self { manager })
    }
}

impl ShortcutRegistrar for GlobalShortcutRegistrar {
    fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        let hotkey = to_os_hotkey(binding)?;
        self.manager
            .register(hotkey)
            .map_err(|err| HotkeyError::Registration(err.to_string()))
    }

    fn unregister(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        let hotkey = to_os_hotkey(binding)?;
        self.manager
            .unregister(hotkey)
            .map_err(|err| HotkeyError::Registration(err.to_string()))
    }
}

/// Manages the currently bound global shortcut, with rollback on failed
/// rebinds.
pub struct HotkeyManager {
    registrar: Box<dyn ShortcutRegistrar>,
    current: Mutex<Option<HotkeyBinding>>,
}

impl HotkeyManager {
    pub fn new(registrar: Box<dyn ShortcutRegistrar>) -> Self {
        Self {
            registrar,
            current: Mutex::new(None),
        }
    }

    /// The binding currently registered with the OS, if any.
    pub fn current(&self) -> Option<HotkeyBinding> {
        self.current.lock().expect("hotkey lock poisoned").clone()
    }

    /// Unregister any existing binding and register `binding` in its place.
    /// On failure the manager is left with no binding; callers that need
    /// the rollback guarantee go through [`HotkeyManager::update`].
    pub fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        let mut current = self.current.lock().expect("hotkey lock poisoned");
        if let Some(previous) = current.take() {
            if let Err(err) = self.registrar.unregister(&previous) {
                tracing::warn!("Failed to unregister previous hotkey: {}", err);
            }
        }
        match self.registrar.register(binding) {
            Ok(()) => {
                *current = Some(binding.clone());
                tracing::info!("Global hotkey registered: {}", binding);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Hotkey registration failed for {}: {}", binding, err);
                Err(err)
            }
        }
    }

    /// Rebind at runtime. On success the new binding is adopted and the
    /// caller's config snapshot is persisted with it; on failure the
    /// previous binding is re-registered and the error reported. The
    /// snapshot is taken as a parameter so an in-flight background save
    /// never gets clobbered by a stale re-read of the file.
    pub fn update(
        &self,
        binding: &HotkeyBinding,
        store: &ConfigStore,
        mut config: AppConfig,
    ) -> Result<(), HotkeyError> {
        let previous = self.current();

        match self.register(binding) {
            Ok(()) => {
                config.hotkey = binding.to_string();
                store.save_in_background(config);
                Ok(())
            }
            Err(err) => {
                if let Some(previous) = previous {
                    if self.register(&previous).is_err() {
                        tracing::error!("Failed to restore previous hotkey {}", previous);
                    }
                }
                Err(err)
            }
        }
    }

    /// Release the active binding, if any.
    pub fn teardown(&self) {
        let mut current = self.current.lock().expect("hotkey lock poisoned");
        if let Some(binding) = current.take() {
            if let Err(err) = self.registrar.unregister(&binding) {
                tracing::warn!("Failed to unregister hotkey on teardown: {}", err);
            }
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn to_os_hotkey(binding: &HotkeyBinding) -> Result<HotKey, HotkeyError> {
    let key = binding.key().ok_or(HotkeyError::ModifierOnly)?;
    let code = key_code(key)
        .ok_or_else(|| HotkeyError::Registration(format!("no key code for {}", key)))?;

    let mut modifiers = Modifiers::empty();
    for modifier in binding.modifiers() {
        modifiers |= match modifier {
            Modifier::Shift => Modifiers::SHIFT,
            Modifier::Control => Modifiers::CONTROL,
            Modifier::Option => Modifiers::ALT,
            Modifier::Command => Modifiers::SUPER,
        };
    }
    Ok(HotKey::new(Some(modifiers), code))
}

fn key_code(key: &str) -> Option<Code> {
    let code = match key {
        "A" => Code::KeyA,
        "B" => Code::KeyB,
        "C" => Code::KeyC,
        "D" => Code::KeyD,
        "E" => Code::KeyE,
        "F" => Code::KeyF,
        "G" => Code::KeyG,
        "H" => Code::KeyH,
        "I" => Code::KeyI,
        "J" => Code::KeyJ,
        "K" => Code::KeyK,
        "L" => Code::KeyL,
        "M" => Code::KeyM,
        "N" => Code::KeyN,
        "O" => Code::KeyO,
        "P" => Code::KeyP,
        "Q" => Code::KeyQ,
        "R" => Code::KeyR,
        "S" => Code::KeyS,
        "T" => Code::KeyT,
        "U" => Code::KeyU,
        "V" => Code::KeyV,
        "W" => Code::KeyW,
        "X" => Code::KeyX,
        "Y" => Code::KeyY,
        "Z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Registrar that records registrations and fails on demand.
    struct FakeRegistrar {
        registered: Mutex<HashSet<String>>,
        reject: Option<String>,
    }

    impl FakeRegistrar {
        fn new(reject: Option<&str>) -> Self {
            Self {
                registered: Mutex::new(HashSet::new()),
                reject: reject.map(String::from),
            }
        }
    }

    impl ShortcutRegistrar for FakeRegistrar {
        fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            let repr = binding.to_string();
            if self.reject.as_deref() == Some(repr.as_str()) {
                return Err(HotkeyError::Registration("rejected".into()));
            }
            self.registered.lock().unwrap().insert(repr);
            Ok(())
        }

        fn unregister(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
            self.registered.lock().unwrap().remove(&binding.to_string());
            Ok(())
        }
    }

    fn manager_with(reject: Option<&str>) -> (HotkeyManager, std::sync::Arc<FakeRegistrar>) {
        // Keep a second handle on the fake for assertions.
        let fake = std::sync::Arc::new(FakeRegistrar::new(reject));
        struct Shared(std::sync::Arc<FakeRegistrar>);
        impl ShortcutRegistrar for Shared {
            fn register(&self, b: &HotkeyBinding) -> Result<(), HotkeyError> {
                self.0.register(b)
            }
            fn unregister(&self, b: &HotkeyBinding) -> Result<(), HotkeyError> {
                self.0.unregister(b)
            }
        }
        (
            HotkeyManager::new(Box::new(Shared(fake.clone()))),
            fake,
        )
    }

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn register_replaces_previous_binding() {
        let (manager, fake) = manager_with(None);
        let first: HotkeyBinding = "Shift+O".parse().unwrap();
        let second: HotkeyBinding = "Control+K".parse().unwrap();

        manager.register(&first).unwrap();
        manager.register(&second).unwrap();

        let registered = fake.registered.lock().unwrap();
        assert!(!registered.contains("Shift+O"));
        assert!(registered.contains("Control+K"));
        drop(registered);
        assert_eq!(manager.current(), Some(second));
    }

    #[test]
    fn failed_update_rolls_back_to_previous_binding() {
        let (manager, fake) = manager_with(Some("Control+K"));
        let (_dir, store) = store();
        let original: HotkeyBinding = "Shift+O".parse().unwrap();
        manager.register(&original).unwrap();

        let bad: HotkeyBinding = "Control+K".parse().unwrap();
        assert!(manager.update(&bad, &store, store.load()).is_err());

        // The previous hotkey must still be registered.
        assert!(fake.registered.lock().unwrap().contains("Shift+O"));
        assert_eq!(manager.current(), Some(original));
    }

    #[test]
    fn successful_update_persists_binding() {
        let (manager, _fake) = manager_with(None);
        let (_dir, store) = store();
        let binding: HotkeyBinding = "Control+Option+P".parse().unwrap();

        manager.update(&binding, &store, store.load()).unwrap();

        assert_eq!(store.load().hotkey, "Control+Option+P");
        assert_eq!(manager.current(), Some(binding));
    }

    #[test]
    fn update_persists_the_supplied_config_snapshot() {
        let (manager, _fake) = manager_with(None);
        let (_dir, store) = store();
        // The on-disk copy still says sound is enabled; the caller's
        // snapshot does not. The snapshot must win.
        store.save(&AppConfig::default()).unwrap();
        let snapshot = AppConfig {
            hotkey: crate::data::DEFAULT_HOTKEY.to_string(),
            sound_enabled: false,
        };
        let binding: HotkeyBinding = "Control+Option+P".parse().unwrap();

        manager.update(&binding, &store, snapshot).unwrap();

        let saved = store.load();
        assert_eq!(saved.hotkey, "Control+Option+P");
        assert!(!saved.sound_enabled);
    }

    #[test]
    fn failed_update_does_not_persist() {
        let (manager, _fake) = manager_with(Some("Control+K"));
        let (_dir, store) = store();
        let original: HotkeyBinding = "Shift+O".parse().unwrap();
        manager.register(&original).unwrap();

        let bad: HotkeyBinding = "Control+K".parse().unwrap();
        let _ = manager.update(&bad, &store, store.load());

        assert_eq!(store.load().hotkey, crate::data::DEFAULT_HOTKEY);
    }

    #[test]
    fn teardown_releases_binding() {
        let (manager, fake) = manager_with(None);
        let binding: HotkeyBinding = "Shift+O".parse().unwrap();
        manager.register(&binding).unwrap();

        manager.teardown();

        assert!(fake.registered.lock().unwrap().is_empty());
        assert_eq!(manager.current(), None);
    }

    #[test]
    fn modifier_only_binding_fails_os_conversion() {
        let binding: HotkeyBinding = "Control+Command".parse().unwrap();
        assert!(matches!(
            to_os_hotkey(&binding),
            Err(HotkeyError::ModifierOnly)
        ));
    }
}
