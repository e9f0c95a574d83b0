//! Hotkey binding strings.
//!
//! A binding is an ordered set of modifiers (Shift, Control, Option,
//! Command) plus an optional terminal key, e.g.
//! `"Shift+Control+Option+Command+O"`. At least one modifier is required;
//! modifier-only combinations need at least two modifiers.

use std::fmt;
use std::str::FromStr;

use crate::data::DEFAULT_HOTKEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Modifier {
    Shift,
    Control,
    Option,
    Command,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "Shift" => Some(Self::Shift),
            "Control" | "Ctrl" => Some(Self::Control),
            "Option" | "Alt" => Some(Self::Option),
            "Command" | "Cmd" | "Meta" => Some(Self::Command),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Shift => "Shift",
            Self::Control => "Control",
            Self::Option => "Option",
            Self::Command => "Command",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("hotkey is empty")]
    Empty,
    #[error("hotkey needs at least one modifier key")]
    NoModifier,
    #[error("modifier-only hotkeys need at least two modifiers")]
    SingleModifier,
    #[error("hotkey has more than one non-modifier key")]
    MultipleKeys,
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),
}

/// A validated hotkey combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    modifiers: Vec<Modifier>,
    key: Option<String>,
}

impl HotkeyBinding {
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// The terminal key, uppercased, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        DEFAULT_HOTKEY
            .parse()
            .unwrap_or(Self {
                modifiers: vec![
                    Modifier::Shift,
                    Modifier::Control,
                    Modifier::Option,
                    Modifier::Command,
                ],
                key: Some("O".to_string()),
            })
    }
}

impl FromStr for HotkeyBinding {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Vec::new();
        let mut key: Option<String> = None;

        for token in s.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(modifier) = Modifier::parse(token) {
                if !modifiers.contains(&modifier) {
                    modifiers.push(modifier);
                }
            } else {
                if key.is_some() {
                    return Err(BindingError::MultipleKeys);
                }
                key = Some(normalize_key(token)?);
            }
        }

        if modifiers.is_empty() && key.is_none() {
            return Err(BindingError::Empty);
        }
        if modifiers.is_empty() {
            return Err(BindingError::NoModifier);
        }
        if key.is_none() && modifiers.len() < 2 {
            return Err(BindingError::SingleModifier);
        }

        modifiers.sort();
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.modifiers.iter().map(|m| m.name()).collect();
        if let Some(key) = &self.key {
            parts.push(key);
        }
        write!(f, "{}", parts.join("+"))
    }
}

fn normalize_key(token: &str) -> Result<String, BindingError> {
    let upper = token.to_uppercase();
    let is_single = upper.len() == 1 && upper.chars().all(|c| c.is_ascii_alphanumeric());
    let is_function = matches!(
        upper.as_str(),
        "F1" | "F2" | "F3" | "F4" | "F5" | "F6" | "F7" | "F8" | "F9" | "F10" | "F11" | "F12"
    );
    if is_single || is_function {
        Ok(upper)
    } else {
        Err(BindingError::UnsupportedKey(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_key_is_rejected() {
        assert_eq!("O".parse::<HotkeyBinding>(), Err(BindingError::NoModifier));
    }

    #[test]
    fn modified_key_is_accepted() {
        let binding: HotkeyBinding = "Shift+O".parse().unwrap();
        assert_eq!(binding.modifiers(), &[Modifier::Shift]);
        assert_eq!(binding.key(), Some("O"));
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!("".parse::<HotkeyBinding>(), Err(BindingError::Empty));
    }

    #[test]
    fn single_modifier_alone_is_rejected() {
        assert_eq!(
            "Shift".parse::<HotkeyBinding>(),
            Err(BindingError::SingleModifier)
        );
    }

    #[test]
    fn two_modifiers_without_key_are_accepted() {
        let binding: HotkeyBinding = "Control+Command".parse().unwrap();
        assert_eq!(binding.key(), None);
        assert_eq!(binding.modifiers().len(), 2);
    }

    #[test]
    fn modifiers_are_ordered_and_deduplicated() {
        let binding: HotkeyBinding = "Command+Shift+Cmd+K".parse().unwrap();
        assert_eq!(binding.to_string(), "Shift+Command+K");
    }

    #[test]
    fn aliases_are_normalized() {
        let binding: HotkeyBinding = "Ctrl+Alt+p".parse().unwrap();
        assert_eq!(binding.to_string(), "Control+Option+P");
    }

    #[test]
    fn two_plain_keys_are_rejected() {
        assert_eq!(
            "Shift+A+B".parse::<HotkeyBinding>(),
            Err(BindingError::MultipleKeys)
        );
    }

    #[test]
    fn unsupported_key_is_rejected() {
        assert!(matches!(
            "Shift+Space".parse::<HotkeyBinding>(),
            Err(BindingError::UnsupportedKey(_))
        ));
    }

    #[test]
    fn default_round_trips_through_display() {
        let binding = HotkeyBinding::default();
        assert_eq!(binding.to_string(), DEFAULT_HOTKEY);
        assert_eq!(DEFAULT_HOTKEY.parse::<HotkeyBinding>().unwrap(), binding);
    }

    #[test]
    fn function_keys_are_supported() {
        let binding: HotkeyBinding = "Control+F5".parse().unwrap();
        assert_eq!(binding.key(), Some("F5"));
    }
}
