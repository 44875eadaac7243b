//! Ordered message store for the active session.
//!
//! The store keeps messages in insertion order and never re-sorts them: provisional records
//! are appended when a send starts and later swapped for the confirmed pair at the tail.
//! Ids are unique within the sequence after every operation. All mutation goes through the
//! four operations below.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{Message, MessageId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.position(id).is_some()
    }

    pub fn provisional_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_provisional()).count()
    }

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    /// Replace the whole sequence, provisional records included.
    ///
    /// Id uniqueness of `messages` is the caller's responsibility; the history parser
    /// already drops duplicates.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        debug_assert!(has_unique_ids(&messages), "replace_all called with duplicate ids");
        self.messages = messages;
    }

    /// Append a locally-created record at the tail
    pub fn append_provisional(&mut self, message: Message) -> Result<(), StoreError> {
        if self.contains(&message.id) {
            return Err(StoreError::DuplicateId(message.id));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Remove the provisional record and append the confirmed pair at the tail.
    ///
    /// Atomic: on error the store is unchanged. `NotFound` means the record was already
    /// reconciled, rolled back or wiped by a history reload.
    pub fn reconcile(
        &mut self,
        provisional_id: &MessageId,
        confirmed: [Message; 2],
    ) -> Result<(), StoreError> {
        let index =
            self.position(provisional_id).ok_or_else(|| StoreError::NotFound(provisional_id.clone()))?;

        let [first, second] = &confirmed;
        if first.id == second.id {
            return Err(StoreError::DuplicateId(second.id.clone()));
        }
        for message in &confirmed {
            if message.id != *provisional_id && self.contains(&message.id) {
                return Err(StoreError::DuplicateId(message.id.clone()));
            }
        }

        self.messages.remove(index);
        self.messages.extend(confirmed);
        Ok(())
    }

    /// Remove a provisional record. Idempotent; returns whether anything was removed.
    pub fn rollback(&mut self, provisional_id: &MessageId) -> bool {
        match self.position(provisional_id) {
            Some(index) => {
                self.messages.remove(index);
                true
            }
            None => false,
        }
    }
}

fn has_unique_ids(messages: &[Message]) -> bool {
    let mut seen = HashSet::with_capacity(messages.len());
    messages.iter().all(|m| seen.insert(&m.id))
}
