//! Rich media host: composes the frame transport, capability dispatch and
//! the shared search session into one page-level object.

mod host;

pub use host::{
    AdEventReporter, HostCapabilities, RICH_MEDIA_INPUT_KEY, RichMediaHost, load_engine_prefs,
};

pub use richmedia_config as config;
pub use richmedia_frame as frame;
pub use richmedia_protocol as protocol;
pub use richmedia_search as search;
