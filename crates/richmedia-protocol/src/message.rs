//! Message schema and validator for the cross-frame channel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::MessageError;
use crate::wire;

/// Ad events the embedded frame may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdEventType {
    Clicked,
    Interaction,
    MediaPlay,
    Media25,
    Media100,
}

impl AdEventType {
    pub const ALL: [AdEventType; 5] = [
        AdEventType::Clicked,
        AdEventType::Interaction,
        AdEventType::MediaPlay,
        AdEventType::Media25,
        AdEventType::Media100,
    ];

    /// Wire literal carried in the `value` field of `richMediaEvent`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdEventType::Clicked => "click",
            AdEventType::Interaction => "interaction",
            AdEventType::MediaPlay => "mediaPlay",
            AdEventType::Media25 => "media25",
            AdEventType::Media100 => "media100",
        }
    }
}

impl fmt::Display for AdEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdEventType {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only: no trimming, no case folding.
        match s {
            "click" => Ok(AdEventType::Clicked),
            "interaction" => Ok(AdEventType::Interaction),
            "mediaPlay" => Ok(AdEventType::MediaPlay),
            "media25" => Ok(AdEventType::Media25),
            "media100" => Ok(AdEventType::Media100),
            other => Err(MessageError::InvalidAdEvent(other.to_string())),
        }
    }
}

/// Messages received from the embedded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingMessage {
    AdEvent(AdEventType),
    SearchAutocompleteQuery(String),
    OpenSearchWithQuery(String),
}

/// Safe-area rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SafeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SafeRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One candidate returned by the autocomplete backend.
///
/// Owned by the backend and treated as immutable data here. Fields this
/// crate does not know about are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteMatch {
    #[serde(default)]
    pub allowed_to_be_default_match: bool,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub destination_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AutocompleteMatch {
    pub fn new(contents: impl Into<String>, destination_url: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            destination_url: destination_url.into(),
            ..Self::default()
        }
    }

    pub fn allowed_to_be_default(mut self, allowed: bool) -> Self {
        self.allowed_to_be_default_match = allowed;
        self
    }
}

/// Messages sent to the embedded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum OutgoingMessage {
    #[serde(rename = "richMediaSafeRect")]
    SafeRect(SafeRect),
    #[serde(rename = "richMediaSearchMatches")]
    SearchMatches(Vec<AutocompleteMatch>),
}

impl OutgoingMessage {
    /// Serialize into the wire shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OutgoingMessage::SafeRect(_) => wire::SAFE_RECT,
            OutgoingMessage::SearchMatches(_) => wire::SEARCH_MATCHES,
        }
    }
}

/// Read an untyped payload as an [`IncomingMessage`], keeping the rejection
/// reason.
pub fn parse_incoming_message(raw: &Value) -> Result<IncomingMessage, MessageError> {
    let object = raw.as_object().ok_or(MessageError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MessageError::MissingType)?;
    let value = object.get("value");

    match kind {
        wire::RICH_MEDIA_EVENT => match value {
            Some(Value::String(literal)) => literal.parse().map(IncomingMessage::AdEvent),
            other => Err(MessageError::InvalidAdEvent(
                other.map_or_else(|| "undefined".to_string(), Value::to_string),
            )),
        },
        wire::QUERY_AUTOCOMPLETE => truthy_string(value)
            .map(IncomingMessage::SearchAutocompleteQuery)
            .ok_or(MessageError::MissingValue(wire::QUERY_AUTOCOMPLETE)),
        wire::OPEN_SEARCH_WITH_QUERY => truthy_string(value)
            .map(IncomingMessage::OpenSearchWithQuery)
            .ok_or(MessageError::MissingValue(wire::OPEN_SEARCH_WITH_QUERY)),
        other => Err(MessageError::UnknownType(other.to_string())),
    }
}

/// Read an untyped payload as an [`IncomingMessage`].
///
/// Never panics. Returns `None` for anything outside the closed message set.
pub fn read_incoming_message(raw: &Value) -> Option<IncomingMessage> {
    parse_incoming_message(raw).ok()
}

fn truthy_string(value: Option<&Value>) -> Option<String> {
    let value = value?;
    is_truthy(value).then(|| coerce_to_string(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
