//! Result options shown under a search input.

use richmedia_protocol::AutocompleteMatch;
use url::Url;

/// One selectable row under the search input.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultOption {
    /// The query itself looks like a URL.
    Url {
        /// Normalized URL opened on activation.
        url: String,
        /// The typed text extended to the end of the normalized URL.
        display: String,
    },
    /// An autocomplete match, with its index in the visible match list.
    Match {
        match_index: usize,
        matched: AutocompleteMatch,
    },
}

impl ResultOption {
    /// Whether this option may be selected without user navigation.
    pub fn can_be_default(&self) -> bool {
        match self {
            ResultOption::Url { .. } => true,
            ResultOption::Match { matched, .. } => matched.allowed_to_be_default_match,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Parse `query` as a URL if it looks like one.
///
/// Text with a scheme is parsed as-is; bare hosts (`brave.com/path`,
/// `localhost:3000`, IPv4 or bracketed IPv6) get `https://` prepended.
pub fn url_for_query(query: &str) -> Option<Url> {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    if trimmed.contains("://") {
        return Url::parse(trimmed).ok().filter(Url::has_host);
    }
    if !looks_like_host(trimmed) {
        return None;
    }
    Url::parse(&format!("https://{trimmed}"))
        .ok()
        .filter(Url::has_host)
}

fn looks_like_host(text: &str) -> bool {
    let authority = text.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.starts_with('[') {
        return true;
    }
    let host = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        Some(_) => return false,
        None => authority,
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }
    let is_ipv4 = labels.len() == 4
        && labels
            .iter()
            .all(|label| label.len() <= 3 && label.bytes().all(|b| b.is_ascii_digit()));
    let tld = labels[labels.len() - 1];
    is_ipv4 || (tld.len() >= 2 && tld.chars().all(char::is_alphabetic))
}

/// Build the option list for `query` given the matches visible to the widget.
pub fn build_result_options(query: &str, matches: &[AutocompleteMatch]) -> Vec<ResultOption> {
    let mut options = Vec::with_capacity(matches.len() + 1);

    if let Some(url) = url_for_query(query) {
        let normalized = url.as_str();
        let typed = query.trim();
        let display = match normalized.find(typed) {
            Some(start) => normalized[start..].to_string(),
            None => normalized.to_string(),
        };
        options.push(ResultOption::Url {
            url: normalized.to_string(),
            display,
        });
    }

    options.extend(
        matches
            .iter()
            .enumerate()
            .map(|(match_index, matched)| ResultOption::Match {
                match_index,
                matched: matched.clone(),
            }),
    );
    options
}

/// First option that may be selected by default.
pub fn default_selection(options: &[ResultOption]) -> Option<usize> {
    options.iter().position(ResultOption::can_be_default)
}

/// Move a selection one step with wraparound.
///
/// From no selection, forward lands on the first option and backward on the
/// last. With no options the selection stays empty.
pub fn step_selection(current: Option<usize>, len: usize, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.filter(|index| *index < len);
    Some(match (current, direction) {
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
        (Some(index), Direction::Forward) => (index + 1) % len,
        (Some(0), Direction::Backward) => len - 1,
        (Some(index), Direction::Backward) => index - 1,
    })
}
