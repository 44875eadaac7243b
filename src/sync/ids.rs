use chrono::{DateTime, Utc};

use crate::models::MessageId;

const PROVISIONAL_PREFIX: &str = "local";

/// Issues provisional ids of the form `local-<millis>-<seq>`.
///
/// The millisecond part mirrors the client clock; `seq` strictly increases for the life of the
/// generator, so two ids minted within the same clock tick (or after the clock steps back)
/// still differ.
#[derive(Debug, Default)]
pub struct ProvisionalIdGenerator {
    seq: u64,
}

impl ProvisionalIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> MessageId {
        self.seq += 1;
        MessageId::Provisional(format!(
            "{}-{}-{}",
            PROVISIONAL_PREFIX,
            now.timestamp_millis(),
            self.seq
        ))
    }
}
