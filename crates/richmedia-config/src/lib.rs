//! Rich media host configuration
//!
//! Settings are loaded from `richmedia.toml` in the working directory, with
//! environment variables taking precedence.

use richmedia_search::{BRAVE_SEARCH_HOST, SearchEngine, default_engines};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "richmedia.toml";

/// Main configuration structure for the rich media host
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RichMediaConfig {
    /// Embedded frame settings
    pub frame: FrameSection,
    /// Search widget settings
    pub search: SearchSection,
    /// Ad click-through settings
    pub ads: AdsSection,
}

/// Embedded frame configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSection {
    /// URL of the embedded document; its origin is the only trusted one
    pub base_url: String,
    /// Quiet window for safe-area and match broadcasts, in milliseconds
    pub broadcast_debounce_ms: u64,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Host of the engine used when no last-used engine is persisted
    pub default_engine: String,
    /// Location of the persisted engine preferences (defaults to ~/.richmedia)
    pub prefs_path: Option<PathBuf>,
    /// Engines available to search widgets
    pub engines: Vec<SearchEngine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdsSection {
    /// Click-through target; without it clicks are reported but not followed
    pub destination_url: Option<String>,
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            base_url: "https://rich-media.invalid/".to_string(),
            broadcast_debounce_ms: 120,
        }
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            default_engine: BRAVE_SEARCH_HOST.to_string(),
            prefs_path: None,
            engines: default_engines(),
        }
    }
}

impl FrameSection {
    pub fn broadcast_debounce(&self) -> Duration {
        Duration::from_millis(self.broadcast_debounce_ms)
    }
}

impl RichMediaConfig {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(RichMediaConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load `richmedia.toml` from the current directory, or defaults if absent
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Apply `RICHMEDIA_*` environment overrides on top of file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|name| std::env::var(name).ok());
    }

    fn merge_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Frame settings
        if let Some(url) = var("RICHMEDIA_BASE_URL") {
            self.frame.base_url = url;
        }
        if let Some(ms) = var("RICHMEDIA_DEBOUNCE_MS").and_then(|v| v.parse::<u64>().ok()) {
            self.frame.broadcast_debounce_ms = ms;
        }

        // Search settings
        if let Some(engine) = var("RICHMEDIA_DEFAULT_ENGINE") {
            self.search.default_engine = engine;
        }
        if let Some(path) = var("RICHMEDIA_PREFS_PATH") {
            self.search.prefs_path = Some(PathBuf::from(path));
        }

        // Ads; an empty value clears the destination
        if let Some(url) = var("RICHMEDIA_DESTINATION_URL") {
            self.ads.destination_url = (!url.is_empty()).then_some(url);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from richmedia.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
