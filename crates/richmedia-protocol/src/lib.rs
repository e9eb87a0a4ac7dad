//! Typed message protocol spoken between the host page and the embedded
//! rich media frame.
//!
//! Inbound payloads arrive as untyped JSON and are narrowed into
//! [`IncomingMessage`] by [`read_incoming_message`]. Anything that does not
//! match the closed set of message shapes is rejected. Validated messages are
//! then turned into host actions by [`dispatch_incoming_message`] through the
//! [`Capabilities`] trait, which the host implements.
//!
//! Outbound traffic is expressed as [`OutgoingMessage`] and serialized with
//! [`OutgoingMessage::to_json`].

mod dispatch;
mod error;
mod message;

pub use dispatch::{Capabilities, dispatch_incoming_message};
pub use error::MessageError;
pub use message::{
    AdEventType, AutocompleteMatch, IncomingMessage, OutgoingMessage, SafeRect,
    parse_incoming_message, read_incoming_message,
};

/// Wire `type` tags used on the cross-frame channel.
pub mod wire {
    pub const RICH_MEDIA_EVENT: &str = "richMediaEvent";
    pub const QUERY_AUTOCOMPLETE: &str = "richMediaQueryBraveSearchAutocomplete";
    pub const OPEN_SEARCH_WITH_QUERY: &str = "richMediaOpenBraveSearchWithQuery";
    pub const SAFE_RECT: &str = "richMediaSafeRect";
    pub const SEARCH_MATCHES: &str = "richMediaSearchMatches";
}
