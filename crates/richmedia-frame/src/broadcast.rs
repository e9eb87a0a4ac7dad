//! Debounced broadcasts from the host to the embedded frame.

use std::time::{Duration, Instant};

use richmedia_protocol::{AutocompleteMatch, OutgoingMessage, SafeRect};
use tracing::{trace, warn};

use crate::debounce::Debouncer;
use crate::transport::FrameHandle;

/// Debounced sender for one kind of outgoing value.
///
/// Pushing without a [`FrameHandle`] is a no-op: nothing is queued for a
/// frame that is not ready. A value is sent only if it differs from the last
/// value that actually reached the frame.
pub struct DebouncedSender<T> {
    debouncer: Debouncer<T>,
    last_sent: Option<T>,
    wrap: fn(T) -> OutgoingMessage,
}

impl<T: Clone + PartialEq> DebouncedSender<T> {
    pub fn new(delay: Duration, wrap: fn(T) -> OutgoingMessage) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            last_sent: None,
            wrap,
        }
    }

    /// Schedule `value`. Returns `false` when dropped for lack of a handle.
    pub fn push(&mut self, handle: Option<&FrameHandle>, value: T, now: Instant) -> bool {
        if handle.is_none() {
            trace!("rich media frame not ready; dropping broadcast");
            return false;
        }
        self.debouncer.push(value, now);
        true
    }

    /// Send the pending value if its quiet window has elapsed. Returns `true`
    /// if a message was posted.
    pub fn poll(&mut self, handle: Option<&FrameHandle>, now: Instant) -> bool {
        let Some(value) = self.debouncer.poll(now) else {
            return false;
        };
        let Some(handle) = handle else {
            return false;
        };
        if self.last_sent.as_ref() == Some(&value) {
            return false;
        }
        match handle.post_message(&(self.wrap)(value.clone())) {
            Ok(()) => {
                self.last_sent = Some(value);
                true
            }
            Err(error) => {
                warn!(%error, "failed to post rich media broadcast");
                false
            }
        }
    }

    pub fn last_sent(&self) -> Option<&T> {
        self.last_sent.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Cancel and forget what was sent; used when the frame document changes.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.last_sent = None;
    }
}

/// Safe-area and match-list broadcasts sharing one debounce discipline.
pub struct Broadcaster {
    safe_rect: DebouncedSender<SafeRect>,
    matches: DebouncedSender<Vec<AutocompleteMatch>>,
}

impl Broadcaster {
    pub fn new(delay: Duration) -> Self {
        Self {
            safe_rect: DebouncedSender::new(delay, OutgoingMessage::SafeRect),
            matches: DebouncedSender::new(delay, OutgoingMessage::SearchMatches),
        }
    }

    pub fn push_safe_rect(&mut self, handle: Option<&FrameHandle>, rect: SafeRect, now: Instant) -> bool {
        self.safe_rect.push(handle, rect, now)
    }

    pub fn push_matches(
        &mut self,
        handle: Option<&FrameHandle>,
        matches: Vec<AutocompleteMatch>,
        now: Instant,
    ) -> bool {
        self.matches.push(handle, matches, now)
    }

    /// Flush every sender whose quiet window elapsed. Returns the number of
    /// messages posted.
    pub fn poll(&mut self, handle: Option<&FrameHandle>, now: Instant) -> usize {
        let mut sent = 0;
        if self.safe_rect.poll(handle, now) {
            sent += 1;
        }
        if self.matches.poll(handle, now) {
            sent += 1;
        }
        sent
    }

    /// Earliest time at which [`Broadcaster::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.safe_rect.deadline(), self.matches.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.safe_rect.is_pending() || self.matches.is_pending()
    }

    pub fn last_sent_safe_rect(&self) -> Option<&SafeRect> {
        self.safe_rect.last_sent()
    }

    pub fn last_sent_matches(&self) -> Option<&[AutocompleteMatch]> {
        self.matches.last_sent().map(Vec::as_slice)
    }

    pub fn cancel(&mut self) {
        self.safe_rect.cancel();
        self.matches.cancel();
    }

    pub fn reset(&mut self) {
        self.safe_rect.reset();
        self.matches.reset();
    }
}
