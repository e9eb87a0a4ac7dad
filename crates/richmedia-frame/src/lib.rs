//! Sandboxed rich media frame transport.
//!
//! This crate hosts one embedded, cross-origin document with minimal trust:
//! the iframe is sandboxed, inbound messages pass through a
//! [`VerifiedChannel`] that checks origin and source before validating the
//! payload, and outbound messages can only be posted through a
//! [`FrameHandle`] that exists once the frame has loaded.
//!
//! High-frequency updates (safe-area geometry, autocomplete matches) go
//! through a [`Broadcaster`] that coalesces bursts and is driven by the host
//! loop via [`RichMediaFrame::pump`].

mod broadcast;
mod channel;
mod debounce;
mod error;
mod page;
mod safe_area;
pub mod sandbox;
mod transport;

use std::time::Duration;

use url::Url;

pub use broadcast::{Broadcaster, DebouncedSender};
pub use channel::{IncomingMessageHandler, VerifiedChannel};
pub use debounce::Debouncer;
pub use error::{FrameError, Result};
pub use page::{HostWindow, ListenerId, MessageEvent, MessageListener, PageMessageBus, WindowId};
pub use safe_area::{ElementBox, SafeAreaObserver};
pub use transport::{FrameElement, FrameHandle, RichMediaFrame};

/// Quiet window for safe-area and match broadcasts.
pub const DEFAULT_BROADCAST_DEBOUNCE: Duration = Duration::from_millis(120);

/// Configuration for a rich media frame.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    base_url: Url,
    expected_origin: String,
    broadcast_debounce: Duration,
}

impl FrameConfig {
    /// Content URL loaded into the frame.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Serialized origin every inbound message must carry and every outbound
    /// message is restricted to.
    pub fn expected_origin(&self) -> &str {
        &self.expected_origin
    }

    pub fn broadcast_debounce(&self) -> Duration {
        self.broadcast_debounce
    }
}

/// Builder for [`FrameConfig`].
pub struct FrameConfigBuilder {
    base_url: String,
    broadcast_debounce: Duration,
}

impl FrameConfigBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            broadcast_debounce: DEFAULT_BROADCAST_DEBOUNCE,
        }
    }

    pub fn with_broadcast_debounce(mut self, delay: Duration) -> Self {
        self.broadcast_debounce = delay;
        self
    }

    pub fn build(self) -> Result<FrameConfig> {
        let base_url = Url::parse(&self.base_url)?;
        let origin = base_url.origin();
        if !origin.is_tuple() {
            return Err(FrameError::OpaqueOrigin(self.base_url));
        }
        Ok(FrameConfig {
            expected_origin: origin.ascii_serialization(),
            base_url,
            broadcast_debounce: self.broadcast_debounce,
        })
    }
}
