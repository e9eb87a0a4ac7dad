//! Verified channel: the only path from page messages to typed messages.
//!
//! An event is accepted only when its origin equals the expected origin
//! exactly and its source is the frame's own content window. Foreign
//! traffic is normal on a busy page, so it is dropped at trace level.
//! Payloads that pass the origin and source checks but fail validation are
//! dropped with a warning.

use std::cell::RefCell;
use std::rc::Rc;

use richmedia_protocol::{IncomingMessage, parse_incoming_message};
use tracing::{trace, warn};

use crate::page::{MessageEvent, MessageListener, WindowId};

/// Receives validated messages from a [`VerifiedChannel`].
pub trait IncomingMessageHandler {
    fn handle_message(&mut self, message: IncomingMessage);
}

impl<F> IncomingMessageHandler for F
where
    F: FnMut(IncomingMessage),
{
    fn handle_message(&mut self, message: IncomingMessage) {
        self(message)
    }
}

pub struct VerifiedChannel {
    expected_origin: String,
    expected_source: WindowId,
    handler: Rc<RefCell<dyn IncomingMessageHandler>>,
}

impl VerifiedChannel {
    pub fn new(
        expected_origin: impl Into<String>,
        expected_source: WindowId,
        handler: Rc<RefCell<dyn IncomingMessageHandler>>,
    ) -> Self {
        Self {
            expected_origin: expected_origin.into(),
            expected_source,
            handler,
        }
    }

    /// Check origin and source, then validate the payload.
    pub fn verify(&self, event: &MessageEvent) -> Option<IncomingMessage> {
        if event.origin != self.expected_origin {
            trace!(origin = %event.origin, "ignoring message from foreign origin");
            return None;
        }
        if event.source != Some(self.expected_source) {
            trace!(source = ?event.source, "ignoring message from foreign window");
            return None;
        }
        match parse_incoming_message(&event.data) {
            Ok(message) => Some(message),
            Err(error) => {
                warn!(%error, "dropping malformed rich media message");
                None
            }
        }
    }
}

impl MessageListener for VerifiedChannel {
    fn on_message(&self, event: &MessageEvent) {
        let Some(message) = self.verify(event) else {
            return;
        };
        match self.handler.try_borrow_mut() {
            Ok(mut handler) => handler.handle_message(message),
            Err(_) => warn!(?message, "message handler is busy; dropping re-entrant message"),
        }
    }
}
