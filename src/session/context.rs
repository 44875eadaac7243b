use std::sync::Arc;

use super::Identity;
use crate::store::ConversationStore;

/// Everything owned by one active identity.
///
/// Contexts are never retargeted: switching identity builds a fresh context with a higher
/// epoch, and completions tagged with an older epoch no longer find their context.
#[derive(Debug)]
pub struct SessionContext {
    identity: Identity,
    epoch: u64,
    store: ConversationStore,
    in_flight: usize,
    send_queue: Arc<tokio::sync::Mutex<()>>,
}

impl SessionContext {
    pub fn new(identity: Identity, epoch: u64) -> Self {
        Self {
            identity,
            epoch,
            store: ConversationStore::new(),
            in_flight: 0,
            send_queue: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    /// Busy while any send issued under this context is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// FIFO gate for serialized sends; a new context starts with an empty queue
    pub fn send_queue(&self) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(&self.send_queue)
    }

    pub(crate) fn send_started(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn send_settled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
