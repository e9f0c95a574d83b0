//! Spellbar - macOS menu-bar spell checker
//!
//! A global hotkey summons a borderless always-on-top popup where the
//! user types or pastes a single word; the app reports whether it is
//! spelled correctly and offers click-to-copy suggestions otherwise.
//! Checking is delegated to a Hunspell-format affix dictionary via the
//! `spellbook` crate.

pub mod business;
pub mod data;
pub mod ipc;
pub mod platform;
pub mod spell;

pub use business::{HotkeyBinding, HotkeyManager, SoundPlayer, WindowController};
pub use data::{AppConfig, ConfigStore};
pub use ipc::Router;
pub use spell::{SpellCheckResult, SpellChecker};
