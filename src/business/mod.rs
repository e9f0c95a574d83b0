//! Business logic: hotkey management, window lifecycle, sound cues.

pub mod hotkey;
pub mod hotkey_manager;
pub mod sound;
pub mod window_controller;

pub use hotkey::{BindingError, HotkeyBinding, Modifier};
pub use hotkey_manager::{GlobalShortcutRegistrar, HotkeyError, HotkeyManager, ShortcutRegistrar};
pub use sound::{NullPlayer, RodioPlayer, SoundCue, SoundPlayer};
pub use window_controller::{
    PopupState, Rect, SettingsState, WindowController, WindowShell, POPUP_HEIGHT, POPUP_WIDTH,
};
