//! The message record and the timestamp rules applied on ingestion.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Display format for stored timestamps, e.g. `01 Jan 10:00`.
pub const DISPLAY_FORMAT: &str = "%d %b %H:%M";

/// Sender name used for every bot reply.
pub const BOT_SENDER: &str = "BOT";

/// A single record of the channel window.
///
/// User messages carry the text of their paired bot reply in
/// `bot_response`; bot messages and the welcome message leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub timestamp: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub movie: Option<String>,
    /// Absent or `null` in the backing file reads as zero.
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot_response: String,
}

impl Message {
    /// Build the bot record that answers a user message.
    pub fn bot_reply(id: impl Into<String>, reply: impl Into<String>, timestamp: String) -> Self {
        Self {
            id: id.into(),
            content: reply.into(),
            sender: BOT_SENDER.to_owned(),
            timestamp,
            category: None,
            movie: None,
            likes: 0,
            bot_response: String::new(),
        }
    }
}

/// A message as posted by a client, before normalisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IncomingMessage {
    pub content: String,
    #[serde(default)]
    pub sender: Option<String>,
    /// ISO-8601 timestamp; anything unparseable falls back to server time.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub movie: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
}

impl IncomingMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Format the caller's timestamp for display, or the current local time if
/// it is absent or not ISO-8601.
pub fn display_timestamp(input: Option<&str>) -> String {
    input
        .and_then(parse_iso)
        .unwrap_or_else(|| Local::now().naive_local())
        .format(DISPLAY_FORMAT)
        .to_string()
}

/// Current local time formatted for display.
pub fn now_display() -> String {
    Local::now().format(DISPLAY_FORMAT).to_string()
}

/// Current local time in ISO-8601 form with microseconds.
pub fn now_iso() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Parse an ISO-8601 date or date-time. An explicit offset keeps the wall
/// clock of that offset rather than converting to local time.
pub fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
