//! Dictionary lifecycle and lookups.
//!
//! The dictionary loads in the background so the popup stays responsive;
//! checks issued before it is ready get an explicit "still loading" answer.
//! If no dictionary can be found or parsed we degrade to an empty one
//! (everything misspelled, no suggestions) rather than failing startup.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::{SpellCheckResult, MAX_SUGGESTIONS};

/// Directories probed for an `en_US.aff`/`en_US.dic` pair, in order.
/// `SPELLBAR_DICT_DIR` takes precedence when set.
const DICT_DIR_CANDIDATES: &[&str] = &[
    "/opt/homebrew/share/hunspell",
    "/usr/local/share/hunspell",
    "/usr/share/hunspell",
    "/Library/Spelling",
];

const DICT_NAME: &str = "en_US";

enum DictionaryState {
    Loading,
    Ready(Box<spellbook::Dictionary>),
    Empty,
}

/// Externally observable dictionary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryStatus {
    Loading,
    Ready,
    Empty,
}

/// Adapter over a Hunspell-format dictionary.
pub struct SpellChecker {
    state: Arc<RwLock<DictionaryState>>,
}

impl SpellChecker {
    /// Checker that has not finished loading yet. Pair with
    /// [`SpellChecker::load_default`].
    pub fn new_loading() -> Self {
        Self {
            state: Arc::new(RwLock::new(DictionaryState::Loading)),
        }
    }

    /// Checker with no dictionary at all.
    pub fn empty() -> Self {
        Self {
            state: Arc::new(RwLock::new(DictionaryState::Empty)),
        }
    }

    /// Build a checker directly from affix and wordlist content.
    pub fn from_strings(aff: &str, dic: &str) -> anyhow::Result<Self> {
        let dict = spellbook::Dictionary::new(aff, dic)
            .map_err(|err| anyhow::anyhow!("failed to parse dictionary: {}", err))?;
        Ok(Self {
            state: Arc::new(RwLock::new(DictionaryState::Ready(Box::new(dict)))),
        })
    }

    pub fn status(&self) -> DictionaryStatus {
        match *self.state.read().expect("dictionary lock poisoned") {
            DictionaryState::Loading => DictionaryStatus::Loading,
            DictionaryState::Ready(_) => DictionaryStatus::Ready,
            DictionaryState::Empty => DictionaryStatus::Empty,
        }
    }

    /// Locate, read, and parse the dictionary off the async executor,
    /// then swap it in. Degrades to the empty dictionary on any failure.
    pub async fn load_default(&self) {
        let loaded = tokio::task::spawn_blocking(load_from_disk).await;
        let mut state = self.state.write().expect("dictionary lock poisoned");
        *state = match loaded {
            Ok(Some(dict)) => {
                tracing::info!("Dictionary loaded");
                DictionaryState::Ready(Box::new(dict))
            }
            Ok(None) => {
                tracing::warn!("No usable dictionary found, spell checking degraded");
                DictionaryState::Empty
            }
            Err(err) => {
                tracing::warn!("Dictionary load task failed: {}", err);
                DictionaryState::Empty
            }
        };
    }

    /// Check a single word. The caller is responsible for input validation
    /// (non-empty, no whitespace); the word is passed through case-sensitively.
    pub fn check(&self, word: &str) -> SpellCheckResult {
        let state = self.state.read().expect("dictionary lock poisoned");
        match &*state {
            DictionaryState::Loading => {
                SpellCheckResult::rejected(word, "Dictionary is still loading, try again")
            }
            DictionaryState::Empty => SpellCheckResult::incorrect(word, Vec::new()),
            DictionaryState::Ready(dict) => {
                if dict.check(word) {
                    SpellCheckResult::correct(word)
                } else {
                    let mut suggestions = Vec::new();
                    dict.suggest(word, &mut suggestions);
                    suggestions.truncate(MAX_SUGGESTIONS);
                    SpellCheckResult::incorrect(word, suggestions)
                }
            }
        }
    }
}

fn load_from_disk() -> Option<spellbook::Dictionary> {
    let (aff_path, dic_path) = locate_dictionary()?;
    tracing::info!("Loading dictionary from {}", aff_path.display());

    let aff = read_logged(&aff_path)?;
    let dic = read_logged(&dic_path)?;

    match spellbook::Dictionary::new(&aff, &dic) {
        Ok(dict) => Some(dict),
        Err(err) => {
            tracing::warn!("Failed to parse {}: {}", aff_path.display(), err);
            None
        }
    }
}

fn read_logged(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::warn!("Failed to read {}: {}", path.display(), err);
            None
        }
    }
}

fn locate_dictionary() -> Option<(PathBuf, PathBuf)> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Ok(dir) = std::env::var("SPELLBAR_DICT_DIR") {
        dirs.push(PathBuf::from(dir));
    }
    dirs.extend(DICT_DIR_CANDIDATES.iter().map(PathBuf::from));
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join("Library/Spelling"));
    }

    for dir in dirs {
        let aff = dir.join(format!("{}.aff", DICT_NAME));
        let dic = dir.join(format!("{}.dic", DICT_NAME));
        if aff.is_file() && dic.is_file() {
            return Some((aff, dic));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_AFF: &str = "SET UTF-8\nTRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ\n";
    const TEST_DIC: &str = "8\nthe\nbe\nto\nof\nand\nhave\nword\nspell\n";

    fn real_checker() -> SpellChecker {
        SpellChecker::from_strings(TEST_AFF, TEST_DIC).unwrap()
    }

    #[test]
    fn known_word_is_correct() {
        let result = real_checker().check("the");
        assert!(result.is_correct);
        assert!(result.suggestions.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn transposed_word_gets_suggestions() {
        let result = real_checker().check("hte");
        assert!(!result.is_correct);
        assert!(!result.suggestions.is_empty());
        assert!(result.suggestions.len() <= MAX_SUGGESTIONS);
        assert!(result.suggestions.iter().any(|s| s == "the"));
    }

    #[test]
    fn loading_checker_reports_loading() {
        let checker = SpellChecker::new_loading();
        assert_eq!(checker.status(), DictionaryStatus::Loading);
        let result = checker.check("anything");
        assert!(!result.is_correct);
        assert!(result.error.is_some());
    }

    #[test]
    fn empty_checker_marks_everything_misspelled() {
        let checker = SpellChecker::empty();
        let result = checker.check("the");
        assert!(!result.is_correct);
        assert!(result.suggestions.is_empty());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn load_failure_degrades_to_empty() {
        // Point the loader at a directory with no dictionary files.
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("SPELLBAR_DICT_DIR", dir.path());
        let checker = SpellChecker::new_loading();
        checker.load_default().await;
        // Either Empty (no system dictionary) or Ready (host has one); in
        // both cases the checker must be out of the loading state.
        assert_ne!(checker.status(), DictionaryStatus::Loading);
    }
}
