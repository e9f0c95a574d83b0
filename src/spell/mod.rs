//! Spell checking
//!
//! Thin adapter over the `spellbook` affix-dictionary engine. This module
//! contributes no spelling logic of its own; it owns dictionary loading,
//! the loading/ready/empty lifecycle, and the result shape handed to the UI.

mod checker;

use serde::Serialize;

pub use checker::{DictionaryStatus, SpellChecker};

/// Upper bound on suggestions returned for a misspelled word.
pub const MAX_SUGGESTIONS: usize = 5;

/// Outcome of checking a single word. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellCheckResult {
    pub word: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpellCheckResult {
    pub fn correct(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_correct: true,
            suggestions: Vec::new(),
            error: None,
        }
    }

    pub fn incorrect(word: impl Into<String>, mut suggestions: Vec<String>) -> Self {
        suggestions.truncate(MAX_SUGGESTIONS);
        Self {
            word: word.into(),
            is_correct: false,
            suggestions,
            error: None,
        }
    }

    /// A result that carries a user-facing message instead of a verdict,
    /// used for input validation failures and the not-yet-loaded dictionary.
    pub fn rejected(word: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_correct: false,
            suggestions: Vec::new(),
            error: Some(message.into()),
        }
    }
}
