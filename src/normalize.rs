//! Inbound payload normalization
//!
//! Z-API webhook payloads are not stable across provider versions: the
//! message text has appeared under `text.message`, `message.text`, `body`,
//! and a handful of other keys. `normalize` tries an explicit, ordered list
//! of known shapes and only then falls back to a bounded recursive search.

use serde_json::Value;

/// Maximum depth for the fallback key search
const MAX_SEARCH_DEPTH: usize = 5;

/// Keys the fallback search treats as possible text carriers
const TEXT_KEY_SYNONYMS: &[&str] = &["message", "text", "body", "content", "conversation"];

/// What kind of provider event a payload turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A user text message
    Text,
    /// A delivery/read status callback
    Status,
    /// Anything we could not interpret
    Other,
}

/// A normalized inbound chat event
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Sender identifier (phone number for `WhatsApp`)
    pub sender_id: String,
    /// Extracted message text, if any
    pub raw_text: Option<String>,
    /// Message was sent by our own number
    pub is_self_sent: bool,
    /// Message came from a group chat
    pub is_group: bool,
    /// Event classification
    pub kind: EventKind,
}

impl InboundEvent {
    /// Whether this event should reach the classifier at all.
    ///
    /// Self-sent messages, group messages, events without text, and events
    /// without an identifiable sender are filtered here and never produce
    /// replies or records.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.kind == EventKind::Text
            && !self.is_self_sent
            && !self.is_group
            && !self.sender_id.is_empty()
            && self.raw_text.as_ref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Normalize a raw webhook payload into an [`InboundEvent`]
///
/// Pure and total: never panics and never fails past this boundary. Shapes
/// it cannot parse come back as `kind: Other` with no text.
#[must_use]
pub fn normalize(raw: &Value) -> InboundEvent {
    let sender_id = extract_sender(raw);
    let is_self_sent = bool_field(raw, "fromMe");
    let is_group = bool_field(raw, "isGroup");

    let raw_text = extract_text(raw);

    let kind = if raw_text.is_some() {
        EventKind::Text
    } else if raw.get("status").is_some_and(Value::is_string) {
        EventKind::Status
    } else {
        EventKind::Other
    };

    InboundEvent {
        sender_id,
        raw_text,
        is_self_sent,
        is_group,
        kind,
    }
}

/// Extract the message text using the ordered rule list, then the bounded
/// fallback search
fn extract_text(raw: &Value) -> Option<String> {
    // Ordered candidate paths, newest provider shape first
    let candidates = [
        raw.pointer("/text/message"),
        raw.pointer("/message/text"),
        raw.get("message"),
        raw.get("body"),
        raw.get("text"),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Some(text) = non_empty_str(candidate) {
            return Some(text);
        }
    }

    search_text_keys(raw, 0)
}

/// Depth-bounded recursive search for any synonym key holding a string
fn search_text_keys(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }

    match value {
        Value::Object(map) => {
            for key in TEXT_KEY_SYNONYMS {
                if let Some(text) = map.get(*key).and_then(non_empty_str) {
                    return Some(text);
                }
            }
            map.values().find_map(|v| search_text_keys(v, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|v| search_text_keys(v, depth + 1)),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn extract_sender(raw: &Value) -> String {
    ["phone", "sender", "from"]
        .iter()
        .find_map(|key| raw.get(*key).and_then(non_empty_str))
        .unwrap_or_default()
}

fn bool_field(raw: &Value, key: &str) -> bool {
    raw.get(key).and_then(Value::as_bool).unwrap_or(false)
}
