//! Replays a JSON-lines script of host events against a rich media host.
//!
//! Run with: cargo run -- script.jsonl   (or pipe the script on stdin)
//!
//! Each line is one event:
//! `{"event":"load"}`, `{"event":"message","origin":"...","data":{...}}`,
//! `{"event":"safe_area","x":0,"y":0,"width":300,"height":200}`,
//! `{"event":"matches","matches":[...]}`, `{"event":"tick","ms":120}`,
//! `{"event":"search","query":"rust"}`, `{"event":"key","key":"ArrowDown"}`,
//! `{"event":"unmount"}`.
//!
//! `search` and `key` events drive a page search widget that starts on the
//! configured `[search] default_engine` and shares the autocomplete session
//! with the frame.

use std::cell::RefCell;
use std::io::{BufRead, BufReader};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use richmedia::config::RichMediaConfig;
use richmedia::frame::{ElementBox, FrameElement, MessageEvent, PageMessageBus, WindowId};
use richmedia::protocol::{AdEventType, AutocompleteMatch};
use richmedia::search::{
    AutocompleteBackend, AutocompleteSession, Navigator, SearchInputController, SearchKey,
    SearchServices,
};
use richmedia::{AdEventReporter, HostCapabilities, RichMediaHost, load_engine_prefs};
use serde::Deserialize;
use serde_json::Value;

const FRAME_WINDOW: WindowId = WindowId(1);
const WIDGET_KEY: &str = "ntp-search";

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    Load,
    Message {
        origin: Option<String>,
        /// Sender window; the frame's own window when absent.
        source: Option<u64>,
        #[serde(default)]
        data: Value,
    },
    SafeArea {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        scroll_x: f64,
        #[serde(default)]
        scroll_y: f64,
    },
    Matches {
        matches: Vec<AutocompleteMatch>,
    },
    Tick {
        ms: u64,
    },
    Search {
        query: String,
    },
    Key {
        key: String,
    },
    Unmount,
}

/// DOM `KeyboardEvent.key` names understood by the search widget.
fn search_key(name: &str) -> SearchKey {
    match name {
        "ArrowUp" => SearchKey::ArrowUp,
        "ArrowDown" => SearchKey::ArrowDown,
        "Enter" => SearchKey::Enter,
        "Escape" => SearchKey::Escape,
        _ => SearchKey::Other,
    }
}

struct StdoutFrame;

impl FrameElement for StdoutFrame {
    fn set_attribute(&self, name: &str, value: &str) {
        log::debug!("iframe {}=\"{}\"", name, value);
    }

    fn content_window(&self) -> Option<WindowId> {
        Some(FRAME_WINDOW)
    }

    fn post_message(&self, payload: &str, target_origin: &str) {
        println!("post {} {}", target_origin, payload);
    }
}

struct LoggingHost;

impl AutocompleteBackend for LoggingHost {
    fn query_autocomplete(&self, text: &str, engine: &str) {
        println!("autocomplete {:?} via {}", text, engine);
    }

    fn stop_autocomplete(&self) {
        println!("autocomplete stopped");
    }
}

impl Navigator for LoggingHost {
    fn open_link(&self, url: &str) {
        println!("open {}", url);
    }
}

impl AdEventReporter for LoggingHost {
    fn report_ad_event(&self, event: AdEventType) {
        println!("ad event {}", event);
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = RichMediaConfig::load();
    let prefs = load_engine_prefs(&config.search)?;
    let logger = Rc::new(LoggingHost);
    let services = SearchServices {
        session: AutocompleteSession::shared(),
        backend: logger.clone(),
        navigator: logger.clone(),
        prefs: Rc::new(RefCell::new(prefs)),
        engines: config.search.engines.clone().into(),
    };
    let mut widget = SearchInputController::new(
        WIDGET_KEY,
        services.clone(),
        config.search.default_engine.clone(),
    );
    log::info!("search widget engine: {:?}", widget.current_engine());
    let capabilities = HostCapabilities::new(services, logger, config.ads.destination_url.clone());

    let bus = Rc::new(PageMessageBus::new());
    let frame_config = RichMediaHost::frame_config(&config)?;
    let origin = frame_config.expected_origin().to_string();
    log::info!("mounting rich media frame at {}", frame_config.base_url());
    let mut host = RichMediaHost::mount(frame_config, Rc::new(StdoutFrame), bus.clone(), capabilities)?;

    let reader: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(&path).with_context(|| format!("opening {}", path))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let start = Instant::now();
    let mut now = start;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: ScriptEvent = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid script event", index + 1))?;
        log::trace!("t+{:?} {:?}", now - start, event);

        match event {
            ScriptEvent::Load => host.on_load(),
            ScriptEvent::Message {
                origin: sender,
                source,
                data,
            } => {
                let source = Some(source.map_or(FRAME_WINDOW, WindowId));
                bus.deliver(&MessageEvent::new(
                    sender.unwrap_or_else(|| origin.clone()),
                    source,
                    data,
                ));
            }
            ScriptEvent::SafeArea {
                x,
                y,
                width,
                height,
                scroll_x,
                scroll_y,
            } => {
                host.on_safe_area_changed(ElementBox::new(x, y, width, height), scroll_x, scroll_y, now);
            }
            ScriptEvent::Matches { matches } => {
                host.on_matches_changed(matches, now);
                widget.refresh();
            }
            ScriptEvent::Tick { ms } => {
                now += Duration::from_millis(ms);
                host.pump(now);
            }
            ScriptEvent::Search { query } => widget.set_query(query),
            ScriptEvent::Key { key } => {
                let result = widget.handle_key(search_key(&key));
                println!(
                    "key {} {:?} selected={:?}",
                    key,
                    result,
                    widget.selected_option()
                );
            }
            ScriptEvent::Unmount => {
                widget.unmount();
                host.unmount();
            }
        }
    }

    // Flush anything still waiting out its quiet window.
    if let Some(deadline) = host.next_deadline() {
        host.pump(deadline);
    }
    log::info!("replay finished after {:?} of script time", now - start);
    Ok(())
}
