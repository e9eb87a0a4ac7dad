use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, io, path::Path, path::PathBuf};
use tracing::warn;

const APP_HOME_DIR: &str = ".richmedia";
const SEARCH_PREFS_FILE: &str = "search_prefs.json";

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchPrefsDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_engine: Option<String>,
    /// Enabled engine hosts, in display order.
    pub enabled_engines: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub usage_counts: BTreeMap<String, u64>,
}

/// Persisted search preferences: last used engine, enabled engines and
/// per-engine usage counts.
///
/// A store without a path lives in memory only.
pub struct EnginePrefsStore {
    path: Option<PathBuf>,
    state: SearchPrefsDocument,
    dirty: bool,
}

impl EnginePrefsStore {
    /// Load from `path`, falling back to `defaults` when the file is missing
    /// or unreadable.
    pub fn load(path: PathBuf, defaults: SearchPrefsDocument) -> Self {
        let state = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice::<SearchPrefsDocument>(&data) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(?error, ?path, "failed to parse search prefs; starting fresh");
                    defaults
                }
            },
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    warn!(?error, ?path, "failed to read search prefs");
                }
                defaults
            }
        };

        Self {
            path: Some(path),
            state,
            dirty: false,
        }
    }

    pub fn in_memory(state: SearchPrefsDocument) -> Self {
        Self {
            path: None,
            state,
            dirty: false,
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Some(mut home) = dirs::home_dir() {
            home.push(APP_HOME_DIR);
            home.push(SEARCH_PREFS_FILE);
            Ok(home)
        } else {
            let mut cwd = std::env::current_dir().context("no home or working directory")?;
            cwd.push(SEARCH_PREFS_FILE);
            Ok(cwd)
        }
    }

    pub fn document(&self) -> &SearchPrefsDocument {
        &self.state
    }

    pub fn last_used_engine(&self) -> Option<&str> {
        self.state.last_used_engine.as_deref()
    }

    pub fn set_last_used_engine(&mut self, host: &str) {
        if self.state.last_used_engine.as_deref() != Some(host) {
            self.state.last_used_engine = Some(host.to_string());
            self.dirty = true;
        }
    }

    pub fn enabled_engines(&self) -> &[String] {
        &self.state.enabled_engines
    }

    pub fn is_enabled(&self, host: &str) -> bool {
        self.state.enabled_engines.iter().any(|e| e == host)
    }

    pub fn set_enabled_engines(&mut self, hosts: Vec<String>) {
        if self.state.enabled_engines != hosts {
            self.state.enabled_engines = hosts;
            self.dirty = true;
        }
    }

    pub fn set_engine_enabled(&mut self, host: &str, enabled: bool) {
        let present = self.is_enabled(host);
        if enabled && !present {
            self.state.enabled_engines.push(host.to_string());
            self.dirty = true;
        } else if !enabled && present {
            self.state.enabled_engines.retain(|e| e != host);
            self.dirty = true;
        }
    }

    pub fn record_usage(&mut self, host: &str) {
        *self.state.usage_counts.entry(host.to_string()).or_default() += 1;
        self.dirty = true;
    }

    pub fn usage_count(&self, host: &str) -> u64 {
        self.state.usage_counts.get(host).copied().unwrap_or(0)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(path) = &self.path {
            write_prefs(path, &self.state)?;
        }
        self.dirty = false;
        Ok(())
    }
}

impl Drop for EnginePrefsStore {
    fn drop(&mut self) {
        if self.dirty
            && let Some(path) = &self.path
            && let Err(error) = write_prefs(path, &self.state)
        {
            warn!(?error, ?path, "failed to persist search prefs during drop");
        }
    }
}

fn write_prefs(path: &Path, doc: &SearchPrefsDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
