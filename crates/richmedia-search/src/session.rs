//! Single-owner arbitration of the shared autocomplete session.
//!
//! Claims are last-writer-wins with no queueing or negotiation. A widget that
//! loses the session is not notified; it finds out because
//! [`AutocompleteSession::read`] starts returning nothing for its key.

use std::cell::RefCell;
use std::rc::Rc;

use richmedia_protocol::AutocompleteMatch;
use tracing::debug;

/// Session shared by every search widget on the page.
pub type SharedSession = Rc<RefCell<AutocompleteSession>>;

#[derive(Debug, Default)]
pub struct AutocompleteSession {
    active_key: Option<String>,
    matches: Vec<AutocompleteMatch>,
}

impl AutocompleteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Make `key` the active input. Returns the previous owner when
    /// ownership changed hands.
    pub fn claim(&mut self, key: &str) -> Option<String> {
        if self.active_key.as_deref() == Some(key) {
            return None;
        }
        let previous = self.active_key.replace(key.to_string());
        if let Some(previous) = &previous {
            debug!(from = %previous, to = %key, "autocomplete session changed owner");
        }
        previous
    }

    /// Matches visible to `key`: the shared slot if `key` is active, else empty.
    pub fn read(&self, key: &str) -> &[AutocompleteMatch] {
        if self.is_active(key) {
            self.matches.as_slice()
        } else {
            &[]
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active_key.as_deref() == Some(key)
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    /// Replace the shared match list; called on backend match notifications.
    pub fn set_matches(&mut self, matches: Vec<AutocompleteMatch>) {
        self.matches = matches;
    }

    /// Give up ownership if `key` holds it. Returns `true` if it did.
    pub fn release(&mut self, key: &str) -> bool {
        if !self.is_active(key) {
            return false;
        }
        self.active_key = None;
        self.matches.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches() -> Vec<AutocompleteMatch> {
        vec![
            AutocompleteMatch::new("brave", "https://brave.com/"),
            AutocompleteMatch::new("brave search", "https://search.brave.com/"),
        ]
    }

    #[test]
    fn inactive_keys_read_nothing() {
        let mut session = AutocompleteSession::new();
        session.set_matches(matches());
        assert!(session.read("a").is_empty());

        session.claim("a");
        assert_eq!(session.read("a"), matches().as_slice());
        assert!(session.read("b").is_empty());
    }

    #[test]
    fn last_claim_wins() {
        let mut session = AutocompleteSession::new();
        session.claim("a");
        session.set_matches(matches());

        assert_eq!(session.claim("b"), Some("a".to_string()));
        assert!(session.read("a").is_empty());
        assert_eq!(session.read("b").len(), 2);
        assert_eq!(session.active_key(), Some("b"));
    }

    #[test]
    fn reclaiming_is_not_an_ownership_change() {
        let mut session = AutocompleteSession::new();
        assert_eq!(session.claim("a"), None);
        assert_eq!(session.claim("a"), None);
        assert!(session.is_active("a"));
    }

    #[test]
    fn only_the_owner_can_release() {
        let mut session = AutocompleteSession::new();
        session.claim("a");
        session.set_matches(matches());

        assert!(!session.release("b"));
        assert!(session.is_active("a"));
        assert!(session.release("a"));
        assert_eq!(session.active_key(), None);
        assert!(session.read("a").is_empty());
    }
}
