//! Data module for configuration persistence

mod config;

pub use config::{AppConfig, ConfigStore, DEFAULT_HOTKEY};
