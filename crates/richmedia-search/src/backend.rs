//! External collaborators consumed by the search controllers.

/// The autocomplete service. It serves one query context at a time and
/// reports results by updating the shared session.
pub trait AutocompleteBackend {
    fn query_autocomplete(&self, text: &str, engine: &str);
    fn stop_autocomplete(&self);
}

/// Host navigation.
pub trait Navigator {
    fn open_link(&self, url: &str);
}
