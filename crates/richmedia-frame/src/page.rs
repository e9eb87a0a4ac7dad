//! Page-level message events and listener registration.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

/// Identity of a browsing context (a window or an iframe's content window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// A cross-document message as delivered to the host page.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// Serialized origin of the sender.
    pub origin: String,
    /// Window the message came from, if the sender is still reachable.
    pub source: Option<WindowId>,
    /// Structured payload; `Value::Null` when the sender posted nothing.
    pub data: Value,
}

impl MessageEvent {
    pub fn new(origin: impl Into<String>, source: Option<WindowId>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            source,
            data,
        }
    }
}

/// Receives every message posted to the page.
pub trait MessageListener {
    fn on_message(&self, event: &MessageEvent);
}

/// Handle returned when a listener is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The host page's message listener registry.
pub trait HostWindow {
    fn add_message_listener(&self, listener: Rc<dyn MessageListener>) -> ListenerId;

    /// Returns `false` if `id` was not registered.
    fn remove_message_listener(&self, id: ListenerId) -> bool;
}

/// In-process [`HostWindow`] that fans each delivered event out to every
/// registered listener.
#[derive(Default)]
pub struct PageMessageBus {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn MessageListener>)>>,
}

impl PageMessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn deliver(&self, event: &MessageEvent) {
        // Listeners may add or remove registrations while handling the event.
        let snapshot: Vec<Rc<dyn MessageListener>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener.on_message(event);
        }
    }
}

impl HostWindow for PageMessageBus {
    fn add_message_listener(&self, listener: Rc<dyn MessageListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_message_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Counter {
        seen: Cell<usize>,
    }

    impl MessageListener for Counter {
        fn on_message(&self, _event: &MessageEvent) {
            self.seen.set(self.seen.get() + 1);
        }
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let bus = PageMessageBus::new();
        let counter = Rc::new(Counter::default());
        let id = bus.add_message_listener(counter.clone());
        let event = MessageEvent::new("https://a.example", None, json!({}));

        bus.deliver(&event);
        assert!(bus.remove_message_listener(id));
        bus.deliver(&event);

        assert_eq!(counter.seen.get(), 1);
        assert_eq!(bus.listener_count(), 0);
        assert!(!bus.remove_message_listener(id));
    }

    #[test]
    fn listener_ids_are_unique() {
        let bus = PageMessageBus::new();
        let a = bus.add_message_listener(Rc::new(Counter::default()));
        let b = bus.add_message_listener(Rc::new(Counter::default()));
        assert_ne!(a, b);
        assert_eq!(bus.listener_count(), 2);
    }
}
