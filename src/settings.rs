//! Game settings
//!
//! Read once at startup from an inline JSON block in the host page:
//!
//! ```html
//! <script id="game-config" type="application/json">{ "total_hearts": 5 }</script>
//! ```
//!
//! Missing fields fall back to defaults. Nothing is ever written back.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HELP_DELAY_MS, DEFAULT_TOTAL_HEARTS};

/// Lines revealed as hearts are caught
pub const DEFAULT_MESSAGES: [&str; 7] = [
    "Reason #1: your smile is illegal 🥲",
    "Reason #2: you make everything feel lighter",
    "Reason #3: I love your laugh",
    "Reason #4: you’re my favorite person",
    "Reason #5: your hugs are home",
    "Reason #6: you’re beautiful (duh)",
    "Reason #7: you’re my peace ❤️",
];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hearts to catch before the final prompt
    pub total_hearts: usize,
    /// Heart messages; heart `i` shows `messages[i % len]`
    pub messages: Vec<String>,
    /// Response to a "yes" on the intro card
    pub intro_yes_line: String,
    /// Response to a "no" on the intro card
    pub intro_no_line: String,
    /// Wait before offering help on the last heart
    pub help_delay_ms: u32,
    /// Skip the shake on the final prompt
    pub reduced_motion: bool,
    /// error | warn | info | debug | trace
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_hearts: DEFAULT_TOTAL_HEARTS,
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            intro_yes_line: "Cool but only if you beat my game".to_string(),
            intro_no_line: "That's rough, play my game and you might change your mind".to_string(),
            help_delay_ms: DEFAULT_HELP_DELAY_MS,
            reduced_motion: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Id of the inline config element
    pub const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Replace values the game cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.total_hearts == 0 {
            log::warn!("total_hearts must be at least 1, using 1");
            self.total_hearts = 1;
        }
        if self.messages.is_empty() {
            log::warn!("No heart messages configured, using defaults");
            self.messages = Self::default().messages;
        }
        self
    }

    /// Message for heart `id` (wraps around the list)
    pub fn message_for(&self, id: usize) -> &str {
        &self.messages[id % self.messages.len()]
    }

    /// Configured log level, `Info` if unrecognized
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load settings from the page's config element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("Bad game config ({}), using defaults", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
