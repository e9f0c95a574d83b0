//! Spellbar - CLI verification mode
//!
//! The full menu-bar session (windows, tray, hotkeys) lives in the Tauri
//! shell under `src-tauri/`. This binary is the quick way to verify the
//! dictionary and config plumbing from a terminal, and it runs on any OS.

use anyhow::Result;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spellbar::spell::DictionaryStatus;
use spellbar::{ConfigStore, SpellChecker};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting Spellbar v{} (CLI mode)", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::new();
    let config = store.load();
    info!("Configuration loaded (hotkey: {})", config.hotkey);

    if !spellbar::platform::session_supported() {
        println!("Note: the menu-bar session is macOS only; CLI mode works everywhere.");
    }

    let checker = SpellChecker::new_loading();
    println!("Loading dictionary...");
    checker.load_default().await;
    match checker.status() {
        DictionaryStatus::Ready => println!("Dictionary ready."),
        DictionaryStatus::Empty => {
            println!("No dictionary found; every word will be reported as misspelled.");
            println!("Set SPELLBAR_DICT_DIR to a directory with en_US.aff/en_US.dic.");
        }
        DictionaryStatus::Loading => unreachable!("load_default always settles"),
    }

    println!();
    println!("Type a word to check it, or 'q' to quit.");

    loop {
        print!(">>> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let word = input.trim();

        match word {
            "" => continue,
            "q" | "quit" | "exit" => break,
            _ if word.split_whitespace().count() > 1 => {
                println!("Please enter only one word at a time");
            }
            _ => {
                let result = checker.check(word);
                if let Some(message) = result.error {
                    println!("{}", message);
                } else if result.is_correct {
                    println!("\"{}\" is spelled correctly", result.word);
                } else if result.suggestions.is_empty() {
                    println!("\"{}\" is not spelled correctly (no suggestions)", result.word);
                } else {
                    println!(
                        "\"{}\" is not spelled correctly. Did you mean: {}",
                        result.word,
                        result.suggestions.join(", ")
                    );
                }
            }
        }
    }

    info!("CLI mode exited");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spellbar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
