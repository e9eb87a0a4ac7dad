use std::cell::RefCell;

use anyhow::Result;
use richmedia_protocol::{
    AdEventType, Capabilities, dispatch_incoming_message, read_incoming_message,
};
use serde_json::{Value, json};

#[derive(Default)]
struct Host {
    events: RefCell<Vec<AdEventType>>,
    destinations_opened: RefCell<u32>,
    searches: RefCell<Vec<String>>,
    queries: RefCell<Vec<String>>,
}

impl Capabilities for Host {
    fn notify_ad_event(&self, event: AdEventType) {
        self.events.borrow_mut().push(event);
    }

    fn open_destination_url(&self) {
        *self.destinations_opened.borrow_mut() += 1;
    }

    fn open_brave_search(&self, query: &str) {
        self.searches.borrow_mut().push(query.to_string());
    }

    fn query_brave_search_autocomplete(&self, query: &str) {
        self.queries.borrow_mut().push(query.to_string());
    }
}

fn feed(host: &Host, raw: &str) -> Result<bool> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(match read_incoming_message(&value) {
        Some(message) => {
            dispatch_incoming_message(&message, host);
            true
        }
        None => false,
    })
}

#[test]
fn wire_literals_reach_the_matching_capability() -> Result<()> {
    let host = Host::default();
    for event in AdEventType::ALL {
        let raw = json!({ "type": "richMediaEvent", "value": event.as_str() }).to_string();
        assert!(feed(&host, &raw)?);
    }

    assert_eq!(*host.events.borrow(), AdEventType::ALL.to_vec());
    assert_eq!(*host.destinations_opened.borrow(), 1);
    assert!(host.searches.borrow().is_empty());
    assert!(host.queries.borrow().is_empty());
    Ok(())
}

#[test]
fn malformed_payloads_never_reach_capabilities() -> Result<()> {
    let host = Host::default();
    for raw in [
        "null",
        "{}",
        r#"{"type":"richMediaEvent","value":"media50"}"#,
        r#"{"type":"richMediaQueryBraveSearchAutocomplete","value":""}"#,
        r#"{"type":"richMediaOpenBraveSearchWithQuery"}"#,
        r#"{"type":"richMediaSafeRect","value":{"x":0,"y":0,"width":1,"height":1}}"#,
    ] {
        assert!(!feed(&host, raw)?, "dispatched {raw}");
    }

    assert!(host.events.borrow().is_empty());
    assert_eq!(*host.destinations_opened.borrow(), 0);
    assert!(host.searches.borrow().is_empty());
    assert!(host.queries.borrow().is_empty());
    Ok(())
}

#[test]
fn search_messages_route_to_search_capabilities() -> Result<()> {
    let host = Host::default();
    feed(
        &host,
        r#"{"type":"richMediaQueryBraveSearchAutocomplete","value":"rust"}"#,
    )?;
    feed(
        &host,
        r#"{"type":"richMediaOpenBraveSearchWithQuery","value":"rust lang"}"#,
    )?;

    assert_eq!(*host.queries.borrow(), vec!["rust".to_string()]);
    assert_eq!(*host.searches.borrow(), vec!["rust lang".to_string()]);
    assert_eq!(*host.events.borrow(), vec![AdEventType::Clicked]);
    assert_eq!(*host.destinations_opened.borrow(), 0);
    Ok(())
}
