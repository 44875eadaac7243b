use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::MessageId;

/// Custom deserializer for timestamp that accepts integers (ms) and RFC3339 strings.
/// Strings without an offset are taken as UTC.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            // Unix timestamp in milliseconds
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => parse_timestamp(&s).map_err(Error::custom),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = s.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }

    // Naive "2024-03-15T09:00:00.123456" as written by some backends
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid RFC3339 timestamp '{}': {}", s, e))
}

/// Custom deserializer for server ids, which may be strings (UUIDs) or integers.
/// Anything read off the wire lands in the confirmed namespace.
pub fn deserialize_message_id<'de, D>(deserializer: D) -> Result<MessageId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Err(Error::custom("message id must be a string or number")),
    };

    if id.trim().is_empty() {
        return Err(Error::custom("message id cannot be empty"));
    }

    Ok(MessageId::Confirmed(id))
}
