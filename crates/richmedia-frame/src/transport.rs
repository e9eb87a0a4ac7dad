//! Rich media frame lifecycle: mount, load, send, unmount.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use richmedia_protocol::{AutocompleteMatch, OutgoingMessage, SafeRect};
use tracing::{debug, trace};

use crate::FrameConfig;
use crate::broadcast::Broadcaster;
use crate::channel::{IncomingMessageHandler, VerifiedChannel};
use crate::error::{FrameError, Result};
use crate::page::{HostWindow, ListenerId, WindowId};
use crate::sandbox;

/// The iframe element hosting the embedded document.
pub trait FrameElement {
    fn set_attribute(&self, name: &str, value: &str);

    /// The iframe's content window, once attached to a document.
    fn content_window(&self) -> Option<WindowId>;

    /// Post a serialized message into the frame, restricted to `target_origin`.
    fn post_message(&self, payload: &str, target_origin: &str);
}

/// Send-only capability for a loaded frame.
///
/// Only [`RichMediaFrame`] creates handles, and only after the frame signals
/// load completion. The target origin is always the configured origin.
pub struct FrameHandle {
    element: Rc<dyn FrameElement>,
    target_origin: String,
}

impl FrameHandle {
    pub fn post_message(&self, message: &OutgoingMessage) -> Result<()> {
        let payload = message.to_json()?;
        trace!(kind = message.kind(), "posting message to rich media frame");
        self.element.post_message(&payload, &self.target_origin);
        Ok(())
    }
}

/// A mounted rich media iframe.
///
/// Mounting installs one page-level listener behind a [`VerifiedChannel`].
/// [`RichMediaFrame::unmount`] (also run on drop) removes that listener,
/// drops the handle and cancels pending broadcasts.
pub struct RichMediaFrame {
    config: FrameConfig,
    element: Rc<dyn FrameElement>,
    window: Rc<dyn HostWindow>,
    listener: Option<ListenerId>,
    handle: Option<FrameHandle>,
    broadcaster: Broadcaster,
}

impl RichMediaFrame {
    pub fn mount(
        config: FrameConfig,
        element: Rc<dyn FrameElement>,
        window: Rc<dyn HostWindow>,
        handler: Rc<RefCell<dyn IncomingMessageHandler>>,
    ) -> Result<Self> {
        let source = element.content_window().ok_or(FrameError::Detached)?;

        element.set_attribute("sandbox", &sandbox::sandbox_attribute());
        element.set_attribute("allow", &sandbox::allow_attribute());
        element.set_attribute("src", config.base_url().as_str());

        let channel = VerifiedChannel::new(config.expected_origin(), source, handler);
        let listener = window.add_message_listener(Rc::new(channel));
        debug!(origin = %config.expected_origin(), ?source, "mounted rich media frame");

        let broadcaster = Broadcaster::new(config.broadcast_debounce());
        Ok(Self {
            config,
            element,
            window,
            listener: Some(listener),
            handle: None,
            broadcaster,
        })
    }

    /// Frame finished loading; from here on a [`FrameHandle`] exists.
    pub fn on_load(&mut self) {
        if self.listener.is_none() {
            trace!("load signal after unmount ignored");
            return;
        }
        if self.handle.is_some() {
            // New document in the same frame; it has seen nothing yet.
            debug!("rich media frame reloaded");
            self.broadcaster.reset();
        }
        self.handle = Some(FrameHandle {
            element: Rc::clone(&self.element),
            target_origin: self.config.expected_origin().to_string(),
        });
    }

    pub fn handle(&self) -> Option<&FrameHandle> {
        self.handle.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_some()
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Schedule a debounced safe-area update. No-op before load.
    pub fn broadcast_safe_rect(&mut self, rect: SafeRect, now: Instant) -> bool {
        self.broadcaster.push_safe_rect(self.handle.as_ref(), rect, now)
    }

    /// Schedule a debounced match-list update. No-op before load.
    pub fn broadcast_matches(&mut self, matches: Vec<AutocompleteMatch>, now: Instant) -> bool {
        self.broadcaster.push_matches(self.handle.as_ref(), matches, now)
    }

    /// Drive pending broadcasts; call from the host loop at or after
    /// [`RichMediaFrame::next_deadline`].
    pub fn pump(&mut self, now: Instant) -> usize {
        self.broadcaster.poll(self.handle.as_ref(), now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.broadcaster.next_deadline()
    }

    pub fn unmount(&mut self) {
        if let Some(id) = self.listener.take() {
            self.window.remove_message_listener(id);
            debug!("unmounted rich media frame");
        }
        self.handle = None;
        self.broadcaster.cancel();
    }
}

impl Drop for RichMediaFrame {
    fn drop(&mut self) {
        self.unmount();
    }
}
