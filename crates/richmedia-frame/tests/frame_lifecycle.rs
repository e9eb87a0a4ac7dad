use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use richmedia_frame::{
    FrameConfig, FrameConfigBuilder, FrameElement, FrameError, HostWindow, IncomingMessageHandler,
    MessageEvent, PageMessageBus, RichMediaFrame, WindowId,
};
use richmedia_protocol::{AdEventType, AutocompleteMatch, IncomingMessage, SafeRect};
use serde_json::{Value, json};

const BASE_URL: &str = "https://rich-media.example/background/";
const ORIGIN: &str = "https://rich-media.example";
const FRAME_WINDOW: WindowId = WindowId(42);
const QUIET: Duration = Duration::from_millis(120);

#[derive(Default)]
struct FakeIframe {
    window: Option<WindowId>,
    attributes: RefCell<HashMap<String, String>>,
    posted: RefCell<Vec<(Value, String)>>,
}

impl FakeIframe {
    fn attached() -> Rc<Self> {
        Rc::new(Self {
            window: Some(FRAME_WINDOW),
            ..Self::default()
        })
    }

    fn posted(&self) -> Vec<(Value, String)> {
        self.posted.borrow().clone()
    }
}

impl FrameElement for FakeIframe {
    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn content_window(&self) -> Option<WindowId> {
        self.window
    }

    fn post_message(&self, payload: &str, target_origin: &str) {
        let value = serde_json::from_str(payload).unwrap_or(Value::Null);
        self.posted
            .borrow_mut()
            .push((value, target_origin.to_string()));
    }
}

struct Fixture {
    bus: Rc<PageMessageBus>,
    iframe: Rc<FakeIframe>,
    received: Rc<RefCell<Vec<IncomingMessage>>>,
    frame: RichMediaFrame,
}

fn config() -> Result<FrameConfig> {
    Ok(FrameConfigBuilder::new(BASE_URL)
        .with_broadcast_debounce(QUIET)
        .build()?)
}

fn mount() -> Result<Fixture> {
    let bus = Rc::new(PageMessageBus::new());
    let iframe = FakeIframe::attached();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let handler: Rc<RefCell<dyn IncomingMessageHandler>> =
        Rc::new(RefCell::new(move |message: IncomingMessage| {
            sink.borrow_mut().push(message)
        }));
    let frame = RichMediaFrame::mount(config()?, iframe.clone(), bus.clone(), handler)?;
    Ok(Fixture {
        bus,
        iframe,
        received,
        frame,
    })
}

fn click_from_frame() -> MessageEvent {
    MessageEvent::new(
        ORIGIN,
        Some(FRAME_WINDOW),
        json!({ "type": "richMediaEvent", "value": "click" }),
    )
}

#[test]
fn mount_applies_sandbox_and_installs_one_listener() -> Result<()> {
    let fixture = mount()?;
    let attributes = fixture.iframe.attributes.borrow();
    assert_eq!(
        attributes.get("sandbox").map(String::as_str),
        Some("allow-scripts allow-same-origin")
    );
    assert!(attributes["allow"].contains("camera 'none'"));
    assert_eq!(attributes.get("src").map(String::as_str), Some(BASE_URL));
    assert_eq!(fixture.bus.listener_count(), 1);
    Ok(())
}

#[test]
fn detached_iframe_cannot_be_mounted() -> Result<()> {
    let bus: Rc<dyn HostWindow> = Rc::new(PageMessageBus::new());
    let handler: Rc<RefCell<dyn IncomingMessageHandler>> =
        Rc::new(RefCell::new(|_message: IncomingMessage| {}));
    let result = RichMediaFrame::mount(config()?, Rc::new(FakeIframe::default()), bus, handler);
    assert!(matches!(result, Err(FrameError::Detached)));
    Ok(())
}

#[test]
fn only_verified_messages_reach_the_handler() -> Result<()> {
    let fixture = mount()?;
    fixture.bus.deliver(&click_from_frame());
    fixture.bus.deliver(&MessageEvent::new(
        "https://other.example",
        Some(FRAME_WINDOW),
        json!({ "type": "richMediaEvent", "value": "click" }),
    ));
    fixture.bus.deliver(&MessageEvent::new(
        ORIGIN,
        Some(WindowId(1)),
        json!({ "type": "richMediaEvent", "value": "click" }),
    ));

    assert_eq!(
        *fixture.received.borrow(),
        vec![IncomingMessage::AdEvent(AdEventType::Clicked)]
    );
    Ok(())
}

#[test]
fn no_handle_and_no_tracking_before_load() -> Result<()> {
    let mut fixture = mount()?;
    let start = Instant::now();

    assert!(fixture.frame.handle().is_none());
    assert!(!fixture.frame.broadcast_safe_rect(SafeRect::new(0.0, 0.0, 10.0, 10.0), start));
    assert!(!fixture.frame.broadcast_matches(vec![AutocompleteMatch::new("a", "https://a/")], start));
    assert!(!fixture.frame.broadcaster().has_pending());
    assert_eq!(fixture.frame.pump(start + QUIET * 2), 0);

    assert!(fixture.frame.broadcaster().last_sent_safe_rect().is_none());
    assert!(fixture.frame.broadcaster().last_sent_matches().is_none());
    assert!(fixture.iframe.posted().is_empty());

    // Nothing sent before load is replayed afterwards.
    fixture.frame.on_load();
    assert_eq!(fixture.frame.pump(start + QUIET * 3), 0);
    assert!(fixture.iframe.posted().is_empty());
    Ok(())
}

#[test]
fn broadcasts_coalesce_and_target_the_configured_origin() -> Result<()> {
    let mut fixture = mount()?;
    fixture.frame.on_load();
    let start = Instant::now();

    for (i, width) in [100.0, 200.0, 300.0].into_iter().enumerate() {
        let at = start + Duration::from_millis(40 * i as u64);
        assert!(fixture.frame.broadcast_safe_rect(SafeRect::new(0.0, 0.0, width, 50.0), at));
    }
    let last_push = start + Duration::from_millis(80);
    assert_eq!(fixture.frame.next_deadline(), Some(last_push + QUIET));
    assert_eq!(fixture.frame.pump(last_push + Duration::from_millis(100)), 0);
    assert_eq!(fixture.frame.pump(last_push + QUIET), 1);

    let posted = fixture.iframe.posted();
    assert_eq!(posted.len(), 1);
    let (payload, target) = &posted[0];
    assert_eq!(target, ORIGIN);
    assert_eq!(payload["type"], "richMediaSafeRect");
    assert_eq!(payload["value"]["width"], 300.0);
    assert_eq!(
        fixture.frame.broadcaster().last_sent_safe_rect(),
        Some(&SafeRect::new(0.0, 0.0, 300.0, 50.0))
    );
    Ok(())
}

#[test]
fn identical_values_are_not_resent() -> Result<()> {
    let mut fixture = mount()?;
    fixture.frame.on_load();
    let start = Instant::now();
    let matches = vec![AutocompleteMatch::new("brave", "https://brave.com/")];

    fixture.frame.broadcast_matches(matches.clone(), start);
    assert_eq!(fixture.frame.pump(start + QUIET), 1);
    fixture.frame.broadcast_matches(matches, start + QUIET);
    assert_eq!(fixture.frame.pump(start + QUIET * 2), 0);
    assert_eq!(fixture.iframe.posted().len(), 1);
    Ok(())
}

#[test]
fn reload_forgets_what_was_sent() -> Result<()> {
    let mut fixture = mount()?;
    fixture.frame.on_load();
    let start = Instant::now();
    let rect = SafeRect::new(0.0, 0.0, 10.0, 10.0);

    fixture.frame.broadcast_safe_rect(rect, start);
    fixture.frame.pump(start + QUIET);
    fixture.frame.on_load();
    assert!(fixture.frame.broadcaster().last_sent_safe_rect().is_none());

    fixture.frame.broadcast_safe_rect(rect, start + QUIET);
    assert_eq!(fixture.frame.pump(start + QUIET * 2), 1);
    assert_eq!(fixture.iframe.posted().len(), 2);
    Ok(())
}

#[test]
fn unmount_removes_listener_and_cancels_pending_sends() -> Result<()> {
    let mut fixture = mount()?;
    fixture.frame.on_load();
    let start = Instant::now();

    fixture
        .frame
        .broadcast_safe_rect(SafeRect::new(0.0, 0.0, 10.0, 10.0), start);
    fixture.frame.unmount();

    assert_eq!(fixture.bus.listener_count(), 0);
    assert!(fixture.frame.handle().is_none());
    assert_eq!(fixture.frame.pump(start + QUIET * 2), 0);
    assert!(fixture.iframe.posted().is_empty());

    fixture.bus.deliver(&click_from_frame());
    assert!(fixture.received.borrow().is_empty());

    // A late load signal does not resurrect the handle.
    fixture.frame.on_load();
    assert!(!fixture.frame.is_ready());
    Ok(())
}

#[test]
fn dropping_the_frame_removes_its_listener() -> Result<()> {
    let fixture = mount()?;
    let bus = Rc::clone(&fixture.bus);
    assert_eq!(bus.listener_count(), 1);
    drop(fixture);
    assert_eq!(bus.listener_count(), 0);
    Ok(())
}
