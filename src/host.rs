use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use richmedia_config::{RichMediaConfig, SearchSection};
use richmedia_frame::{
    ElementBox, FrameConfig, FrameConfigBuilder, FrameElement, HostWindow, IncomingMessageHandler,
    RichMediaFrame, SafeAreaObserver,
};
use richmedia_protocol::{
    AdEventType, AutocompleteMatch, Capabilities, IncomingMessage, dispatch_incoming_message,
};
use richmedia_search::{
    BRAVE_SEARCH_HOST, EnginePrefsStore, SearchEngine, SearchPrefsDocument, SearchServices,
};
use tracing::{debug, trace};

/// Session key used for autocomplete queries issued by the embedded frame.
pub const RICH_MEDIA_INPUT_KEY: &str = "rich-media";

/// Sink for ad events reported by the embedded frame.
pub trait AdEventReporter {
    fn report_ad_event(&self, event: AdEventType);
}

/// The host side of [`Capabilities`].
pub struct HostCapabilities {
    services: SearchServices,
    reporter: Rc<dyn AdEventReporter>,
    destination_url: Option<String>,
}

impl HostCapabilities {
    pub fn new(
        services: SearchServices,
        reporter: Rc<dyn AdEventReporter>,
        destination_url: Option<String>,
    ) -> Self {
        Self {
            services,
            reporter,
            destination_url,
        }
    }

    pub fn services(&self) -> &SearchServices {
        &self.services
    }

    fn brave_engine(&self) -> Option<&SearchEngine> {
        self.services
            .engines
            .iter()
            .find(|engine| engine.host == BRAVE_SEARCH_HOST)
    }
}

impl Capabilities for HostCapabilities {
    fn notify_ad_event(&self, event: AdEventType) {
        self.reporter.report_ad_event(event);
    }

    fn open_destination_url(&self) {
        match &self.destination_url {
            Some(url) => self.services.navigator.open_link(url),
            None => debug!("no destination url configured; click-through skipped"),
        }
    }

    fn open_brave_search(&self, query: &str) {
        match self.brave_engine() {
            Some(engine) => self.services.navigator.open_link(&engine.search_url_for(query)),
            None => debug!("brave search engine not configured; search skipped"),
        }
    }

    fn query_brave_search_autocomplete(&self, query: &str) {
        self.services.session.borrow_mut().claim(RICH_MEDIA_INPUT_KEY);
        if query.is_empty() {
            self.services.backend.stop_autocomplete();
            return;
        }
        let text = match self.brave_engine() {
            Some(engine) => engine.compose_query(query),
            None => query.to_string(),
        };
        self.services
            .backend
            .query_autocomplete(&text, BRAVE_SEARCH_HOST);
    }
}

/// A mounted rich media background together with the capabilities its
/// messages are dispatched to.
///
/// The message handler only holds the capabilities, never the host, so the
/// page-level listener does not keep the frame alive.
pub struct RichMediaHost {
    frame: RichMediaFrame,
    capabilities: Rc<HostCapabilities>,
    safe_area: SafeAreaObserver,
}

impl RichMediaHost {
    pub fn mount(
        config: FrameConfig,
        element: Rc<dyn FrameElement>,
        window: Rc<dyn HostWindow>,
        capabilities: HostCapabilities,
    ) -> richmedia_frame::Result<Self> {
        let capabilities = Rc::new(capabilities);
        let dispatcher = Rc::clone(&capabilities);
        let handler: Rc<RefCell<dyn IncomingMessageHandler>> =
            Rc::new(RefCell::new(move |message: IncomingMessage| {
                dispatch_incoming_message(&message, dispatcher.as_ref())
            }));
        let frame = RichMediaFrame::mount(config, element, window, handler)?;
        Ok(Self {
            frame,
            capabilities,
            safe_area: SafeAreaObserver::new(),
        })
    }

    /// Frame config derived from the `[frame]` section.
    pub fn frame_config(config: &RichMediaConfig) -> richmedia_frame::Result<FrameConfig> {
        FrameConfigBuilder::new(config.frame.base_url.as_str())
            .with_broadcast_debounce(config.frame.broadcast_debounce())
            .build()
    }

    pub fn frame(&self) -> &RichMediaFrame {
        &self.frame
    }

    pub fn capabilities(&self) -> &HostCapabilities {
        &self.capabilities
    }

    pub fn on_load(&mut self) {
        self.frame.on_load();
        // The new document has not seen any geometry yet.
        self.safe_area.reset();
    }

    /// Feed an observation of the safe-area element. Observations before the
    /// frame has loaded are ignored so the first one after load is sent.
    pub fn on_safe_area_changed(
        &mut self,
        bounds: ElementBox,
        scroll_x: f64,
        scroll_y: f64,
        now: Instant,
    ) -> bool {
        if !self.frame.is_ready() {
            trace!("safe area observed before frame load");
            return false;
        }
        match self.safe_area.observe(bounds, scroll_x, scroll_y) {
            Some(rect) => self.frame.broadcast_safe_rect(rect, now),
            None => false,
        }
    }

    /// Backend match notification. Stores the matches in the shared session
    /// and forwards what the frame may see: the matches while it owns the
    /// session, an empty list once another widget has claimed it.
    pub fn on_matches_changed(&mut self, matches: Vec<AutocompleteMatch>, now: Instant) -> bool {
        let visible = {
            let mut session = self.capabilities.services.session.borrow_mut();
            session.set_matches(matches);
            session.read(RICH_MEDIA_INPUT_KEY).to_vec()
        };
        self.frame.broadcast_matches(visible, now)
    }

    pub fn pump(&mut self, now: Instant) -> usize {
        self.frame.pump(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.frame.next_deadline()
    }

    pub fn unmount(&mut self) {
        self.frame.unmount();
        let released = self
            .capabilities
            .services
            .session
            .borrow_mut()
            .release(RICH_MEDIA_INPUT_KEY);
        if released {
            self.capabilities.services.backend.stop_autocomplete();
        }
    }
}

impl Drop for RichMediaHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Open the engine preferences named by `[search]`, enabling every
/// configured engine when nothing is persisted yet.
pub fn load_engine_prefs(search: &SearchSection) -> Result<EnginePrefsStore> {
    let path = match &search.prefs_path {
        Some(path) => path.clone(),
        None => EnginePrefsStore::default_path()?,
    };
    let defaults = SearchPrefsDocument {
        enabled_engines: search.engines.iter().map(|e| e.host.clone()).collect(),
        ..SearchPrefsDocument::default()
    };
    Ok(EnginePrefsStore::load(path, defaults))
}
