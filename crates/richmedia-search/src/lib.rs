//! Search input coordination for pages with several search boxes.
//!
//! The autocomplete backend serves one query context at a time, so every
//! search widget on the page shares a single [`AutocompleteSession`]. A
//! widget claims the session with its own key before querying and reads
//! matches only through [`AutocompleteSession::read`], which hides matches
//! belonging to whichever widget claimed last.
//!
//! Each widget drives its own [`SearchInputController`]: query text, result
//! options, keyboard navigation and search-engine selection.

mod backend;
mod controller;
mod engine;
mod options;
mod prefs;
mod session;

pub use backend::{AutocompleteBackend, Navigator};
pub use controller::{EventResult, SearchInputController, SearchKey, SearchServices};
pub use engine::{BRAVE_SEARCH_HOST, SearchEngine, default_engines, resolve_engine};
pub use options::{
    Direction, ResultOption, build_result_options, default_selection, step_selection,
    url_for_query,
};
pub use prefs::{EnginePrefsStore, SearchPrefsDocument};
pub use session::{AutocompleteSession, SharedSession};
