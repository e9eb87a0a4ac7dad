//! Search engines and engine resolution.

use serde::{Deserialize, Serialize};

pub const BRAVE_SEARCH_HOST: &str = "search.brave.com";

const SEARCH_TERMS: &str = "{searchTerms}";

/// A search engine the user can pick, identified by `host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    pub host: String,
    pub name: String,
    /// Keyword prefix understood by the autocomplete backend (e.g. `:g`).
    #[serde(default)]
    pub keyword: String,
    /// Results URL template containing `{searchTerms}`.
    pub search_url: String,
}

impl SearchEngine {
    pub fn new(
        host: impl Into<String>,
        name: impl Into<String>,
        keyword: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            keyword: keyword.into(),
            search_url: search_url.into(),
        }
    }

    /// Autocomplete text for `query`, prefixed with the engine keyword.
    pub fn compose_query(&self, query: &str) -> String {
        if self.keyword.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", self.keyword, query)
        }
    }

    pub fn search_url_for(&self, query: &str) -> String {
        self.search_url
            .replace(SEARCH_TERMS, &urlencoding::encode(query))
    }
}

pub fn default_engines() -> Vec<SearchEngine> {
    vec![
        SearchEngine::new(
            BRAVE_SEARCH_HOST,
            "Brave Search",
            ":br",
            "https://search.brave.com/search?q={searchTerms}",
        ),
        SearchEngine::new(
            "www.google.com",
            "Google",
            ":g",
            "https://www.google.com/search?q={searchTerms}",
        ),
        SearchEngine::new(
            "www.bing.com",
            "Bing",
            ":b",
            "https://www.bing.com/search?q={searchTerms}",
        ),
        SearchEngine::new(
            "duckduckgo.com",
            "DuckDuckGo",
            ":d",
            "https://duckduckgo.com/?q={searchTerms}",
        ),
    ]
}

/// Pick the engine to use: the last used engine if still enabled, else the
/// default engine if enabled, else the first enabled engine.
pub fn resolve_engine(
    last_used: Option<&str>,
    default_engine: &str,
    enabled: &[String],
) -> Option<String> {
    let is_enabled = |host: &str| enabled.iter().any(|e| e == host);
    if let Some(last) = last_used
        && is_enabled(last)
    {
        return Some(last.to_string());
    }
    if is_enabled(default_engine) {
        return Some(default_engine.to_string());
    }
    enabled.first().cloned()
}
