/// Runtime settings for the scratchpad popup
use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_PREFIX: &str = "site:";
pub const DEFAULT_NOTES_DEBOUNCE_MS: u32 = 300;
pub const DEFAULT_OPEN_SCHEME: &str = "https";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchpadConfig {
    /// Prefix marking a storage key as a site record
    pub key_prefix: String,
    /// Quiet period before a notes edit is written
    pub notes_debounce_ms: u32,
    /// Scheme used when opening a saved host in a new tab
    pub open_scheme: String,
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        ScratchpadConfig {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            notes_debounce_ms: DEFAULT_NOTES_DEBOUNCE_MS,
            open_scheme: DEFAULT_OPEN_SCHEME.to_string(),
        }
    }
}
