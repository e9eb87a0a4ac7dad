//! Capability dispatch: validated messages become host actions.

use tracing::trace;

use crate::message::{AdEventType, IncomingMessage};

/// Privileged actions the embedded frame may indirectly trigger.
///
/// Implemented by the host. The trait carries no state of its own; any
/// state lives behind the implementor, so every method takes `&self`.
pub trait Capabilities {
    /// Report an ad event.
    fn notify_ad_event(&self, event: AdEventType);

    /// Navigate to the configured ad destination, if there is one.
    fn open_destination_url(&self);

    /// Open a search results page for `query`.
    fn open_brave_search(&self, query: &str);

    /// Start an autocomplete query on behalf of the embedded search box.
    fn query_brave_search_autocomplete(&self, query: &str);
}

/// Map a validated message onto capability calls.
///
/// Call order is part of the contract: the ad event is always reported
/// before any navigation it implies.
pub fn dispatch_incoming_message(message: &IncomingMessage, capabilities: &dyn Capabilities) {
    trace!(?message, "dispatching rich media message");
    match message {
        IncomingMessage::AdEvent(event) => {
            capabilities.notify_ad_event(*event);
            if *event == AdEventType::Clicked {
                capabilities.open_destination_url();
            }
        }
        IncomingMessage::SearchAutocompleteQuery(query) => {
            capabilities.query_brave_search_autocomplete(query);
        }
        IncomingMessage::OpenSearchWithQuery(query) => {
            // Opening a search from the frame counts as a click-through.
            capabilities.notify_ad_event(AdEventType::Clicked);
            capabilities.open_brave_search(query);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Notify(AdEventType),
        OpenDestination,
        OpenSearch(String),
        Query(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
    }

    impl Capabilities for Recorder {
        fn notify_ad_event(&self, event: AdEventType) {
            self.calls.borrow_mut().push(Call::Notify(event));
        }

        fn open_destination_url(&self) {
            self.calls.borrow_mut().push(Call::OpenDestination);
        }

        fn open_brave_search(&self, query: &str) {
            self.calls.borrow_mut().push(Call::OpenSearch(query.to_string()));
        }

        fn query_brave_search_autocomplete(&self, query: &str) {
            self.calls.borrow_mut().push(Call::Query(query.to_string()));
        }
    }

    fn dispatch(message: IncomingMessage) -> Vec<Call> {
        let recorder = Recorder::default();
        dispatch_incoming_message(&message, &recorder);
        recorder.calls.into_inner()
    }

    #[test]
    fn click_reports_then_navigates() {
        assert_eq!(
            dispatch(IncomingMessage::AdEvent(AdEventType::Clicked)),
            vec![Call::Notify(AdEventType::Clicked), Call::OpenDestination]
        );
    }

    #[test]
    fn non_click_events_only_report() {
        for event in AdEventType::ALL
            .into_iter()
            .filter(|e| *e != AdEventType::Clicked)
        {
            assert_eq!(
                dispatch(IncomingMessage::AdEvent(event)),
                vec![Call::Notify(event)]
            );
        }
    }

    #[test]
    fn open_search_is_an_implicit_click() {
        assert_eq!(
            dispatch(IncomingMessage::OpenSearchWithQuery("q".into())),
            vec![
                Call::Notify(AdEventType::Clicked),
                Call::OpenSearch("q".into())
            ]
        );
    }

    #[test]
    fn autocomplete_query_only_queries() {
        assert_eq!(
            dispatch(IncomingMessage::SearchAutocompleteQuery("q".into())),
            vec![Call::Query("q".into())]
        );
    }
}
