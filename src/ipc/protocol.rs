//! Request/response types for the UI boundary.
//!
//! Each operation is a single request/response pair with no streaming.
//! The shell's commands construct requests and hand them to the router;
//! tags use the same kebab-case channel names the UI invokes.

use serde::{Deserialize, Serialize};

use crate::data::AppConfig;
use crate::spell::SpellCheckResult;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "request", rename_all = "kebab-case")]
pub enum IpcRequest {
    SpellCheck { word: String },
    GetClipboard,
    SetClipboard { text: String },
    HideWindow,
    GetSettings,
    UpdateHotkey { binding: String },
    UpdateSoundSetting { enabled: bool },
    OpenSettings,
    CloseSettings,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "response", rename_all = "kebab-case")]
pub enum IpcResponse {
    SpellCheck {
        #[serde(flatten)]
        result: SpellCheckResult,
    },
    Clipboard {
        text: String,
    },
    ClipboardWritten {
        ok: bool,
    },
    Settings {
        #[serde(flatten)]
        settings: AppConfig,
    },
    HotkeyUpdated {
        ok: bool,
        hotkey: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Ack,
}
