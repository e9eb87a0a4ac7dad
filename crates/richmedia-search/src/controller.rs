//! Per-widget search input state machine.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::backend::{AutocompleteBackend, Navigator};
use crate::engine::{SearchEngine, resolve_engine};
use crate::options::{Direction, ResultOption, build_result_options, default_selection, step_selection};
use crate::prefs::EnginePrefsStore;
use crate::session::SharedSession;

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was consumed; default handling (form submission) is suppressed.
    Handled,
    /// Event was not handled, continue propagation
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Other,
}

/// Collaborators shared by every search widget on a page.
#[derive(Clone)]
pub struct SearchServices {
    pub session: SharedSession,
    pub backend: Rc<dyn AutocompleteBackend>,
    pub navigator: Rc<dyn Navigator>,
    pub prefs: Rc<RefCell<EnginePrefsStore>>,
    pub engines: Rc<[SearchEngine]>,
}

/// One search widget: query text, result options, selection and engine.
///
/// Matches are only ever read through the shared session under this
/// controller's key, so results queried by another widget never show up here.
pub struct SearchInputController {
    key: String,
    services: SearchServices,
    default_engine: String,
    query: String,
    current_engine: Option<String>,
    result_options: Vec<ResultOption>,
    selected: Option<usize>,
}

impl SearchInputController {
    pub fn new(
        key: impl Into<String>,
        services: SearchServices,
        default_engine: impl Into<String>,
    ) -> Self {
        let mut controller = Self {
            key: key.into(),
            services,
            default_engine: default_engine.into(),
            query: String::new(),
            current_engine: None,
            result_options: Vec::new(),
            selected: None,
        };
        controller.current_engine = controller.resolve_engine();
        controller
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_engine(&self) -> Option<&str> {
        self.current_engine.as_deref()
    }

    /// Engine record for the current engine host, if configured.
    pub fn engine(&self) -> Option<&SearchEngine> {
        let host = self.current_engine.as_deref()?;
        self.services.engines.iter().find(|engine| engine.host == host)
    }

    pub fn result_options(&self) -> &[ResultOption] {
        &self.result_options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&ResultOption> {
        self.selected.and_then(|index| self.result_options.get(index))
    }

    pub fn is_active(&self) -> bool {
        self.services.session.borrow().is_active(&self.key)
    }

    /// Replace the query text. A non-empty query claims the session and asks
    /// the backend for matches; an empty one stops autocomplete.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.query.is_empty() {
            self.stop_if_active();
        } else {
            self.services.session.borrow_mut().claim(&self.key);
            self.issue_query();
        }
        self.refresh();
    }

    /// Rebuild result options from the matches visible to this widget.
    /// Call after every backend match notification.
    pub fn refresh(&mut self) {
        let options = if self.query.is_empty() {
            Vec::new()
        } else {
            let session = self.services.session.borrow();
            build_result_options(&self.query, session.read(&self.key))
        };
        self.result_options = options;
        self.selected = default_selection(&self.result_options);
    }

    pub fn handle_key(&mut self, key: SearchKey) -> EventResult {
        match key {
            SearchKey::ArrowDown => self.step(Direction::Forward),
            SearchKey::ArrowUp => self.step(Direction::Backward),
            SearchKey::Enter => self.activate(),
            SearchKey::Escape => self.set_query(""),
            SearchKey::Other => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    /// Switch to the engine identified by `host`. Returns `false` if that
    /// engine is not enabled.
    pub fn select_engine(&mut self, host: &str) -> bool {
        if !self.services.prefs.borrow().is_enabled(host) {
            debug!(engine = %host, "ignoring selection of disabled engine");
            return false;
        }
        self.services.prefs.borrow_mut().set_last_used_engine(host);
        if self.current_engine.as_deref() != Some(host) {
            self.current_engine = Some(host.to_string());
            self.restart_autocomplete();
        }
        true
    }

    /// Re-resolve the engine after the enabled set changed, if the current
    /// engine is no longer part of it.
    pub fn on_prefs_changed(&mut self) {
        let still_enabled = self
            .current_engine
            .as_deref()
            .is_some_and(|host| self.services.prefs.borrow().is_enabled(host));
        if still_enabled {
            return;
        }
        let resolved = self.resolve_engine();
        if resolved != self.current_engine {
            debug!(from = ?self.current_engine, to = ?resolved, "current engine re-resolved");
            self.current_engine = resolved;
            self.restart_autocomplete();
        }
    }

    /// Give the session back if this widget owns it.
    pub fn unmount(&mut self) {
        let released = self.services.session.borrow_mut().release(&self.key);
        if released {
            self.services.backend.stop_autocomplete();
        }
        self.result_options.clear();
        self.selected = None;
    }

    fn resolve_engine(&self) -> Option<String> {
        let prefs = self.services.prefs.borrow();
        resolve_engine(
            prefs.last_used_engine(),
            &self.default_engine,
            prefs.enabled_engines(),
        )
    }

    fn step(&mut self, direction: Direction) {
        self.selected = step_selection(self.selected, self.result_options.len(), direction);
    }

    fn activate(&self) {
        match self.selected_option() {
            Some(ResultOption::Url { url, .. }) => self.services.navigator.open_link(url),
            Some(ResultOption::Match { matched, .. }) => {
                self.record_engine_usage();
                self.services.navigator.open_link(&matched.destination_url);
            }
            None if !self.query.is_empty() => self.search_directly(),
            None => {}
        }
    }

    fn search_directly(&self) {
        let Some(engine) = self.engine() else {
            debug!(key = %self.key, "no search engine available for direct search");
            return;
        };
        self.record_engine_usage();
        self.services
            .navigator
            .open_link(&engine.search_url_for(&self.query));
    }

    fn record_engine_usage(&self) {
        if let Some(host) = self.current_engine.as_deref() {
            self.services.prefs.borrow_mut().record_usage(host);
        }
    }

    fn issue_query(&self) {
        let Some(host) = self.current_engine.as_deref() else {
            debug!(key = %self.key, "no enabled search engine; autocomplete skipped");
            return;
        };
        let text = match self.engine() {
            Some(engine) => engine.compose_query(&self.query),
            None => self.query.clone(),
        };
        trace!(key = %self.key, engine = %host, "querying autocomplete");
        self.services.backend.query_autocomplete(&text, host);
    }

    fn stop_if_active(&self) {
        if self.is_active() {
            self.services.backend.stop_autocomplete();
        }
    }

    fn restart_autocomplete(&mut self) {
        self.stop_if_active();
        if !self.query.is_empty() {
            self.services.session.borrow_mut().claim(&self.key);
            self.issue_query();
        }
        self.refresh();
    }
}
