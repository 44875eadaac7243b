use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::models::Message;

/// Parse the body of `GET /api/messages` into an ordered message list.
///
/// Gracefully handles malformed entries by logging and skipping them. Entries whose id was
/// already seen are dropped too, so the result is always safe to hand to the store.
/// Returns an error if the body is not a JSON array or more than 50% of entries fail to parse.
pub fn parse_history_payload(body: &str) -> Result<Vec<Message>, ServiceError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ServiceError::Decode(format!("history body is not JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(ServiceError::Decode("history body must be a JSON array".to_string()));
    };

    let total = items.len();
    let mut messages = Vec::with_capacity(total);
    let mut seen = HashSet::with_capacity(total);
    let mut skipped_count = 0;
    let mut duplicate_count = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Message>(item) {
            Ok(message) => {
                if seen.insert(message.id.clone()) {
                    messages.push(message);
                } else {
                    warn!(id = %message.id, "Dropping history entry with duplicate id");
                    duplicate_count += 1;
                }
            }
            Err(e) => {
                warn!("Failed to parse history entry {}: {}", index, e);
                skipped_count += 1;
            }
        }
    }

    // Check if failure rate is too high
    if total > 0 {
        let failure_rate = (skipped_count as f64) / (total as f64);
        if failure_rate > 0.5 {
            return Err(ServiceError::Decode(format!(
                "Too many malformed history entries: {} of {} failed ({:.1}%)",
                skipped_count,
                total,
                failure_rate * 100.0
            )));
        }
    }

    if skipped_count > 0 || duplicate_count > 0 {
        debug!(
            "Parsed history: {} messages ({} malformed, {} duplicate)",
            messages.len(),
            skipped_count,
            duplicate_count
        );
    }

    Ok(messages)
}
