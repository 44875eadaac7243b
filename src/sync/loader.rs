use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::SessionState;
use crate::error::ChatError;
use crate::models::Message;
use crate::service::ConversationService;
use crate::session::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// History replaced the store; carries the message count
    Loaded(usize),
    /// The identity changed while the request was in flight
    Discarded,
}

/// Fetches full histories; never merges, only replaces
#[derive(Clone)]
pub struct HistoryLoader {
    service: Arc<dyn ConversationService>,
}

impl HistoryLoader {
    pub fn new(service: Arc<dyn ConversationService>) -> Self {
        Self { service }
    }

    pub async fn load(&self, identity: &Identity) -> Result<Vec<Message>, ChatError> {
        self.service.fetch_history(identity).await.map_err(|source| {
            warn!(identity = %identity, "History fetch failed: {}", source);
            ChatError::HistoryUnavailable { source }
        })
    }
}

/// Apply a finished load to the context it was issued for.
///
/// On failure the store keeps its previous content and the error is recorded for the banner.
pub(crate) fn apply_history(
    state: &mut SessionState,
    epoch: u64,
    result: Result<Vec<Message>, ChatError>,
) -> Result<LoadOutcome, ChatError> {
    let Some(context) = state.context.as_mut().filter(|c| c.epoch() == epoch) else {
        debug!(epoch, "Discarding history for a previous session");
        return Ok(LoadOutcome::Discarded);
    };

    match result {
        Ok(messages) => {
            let count = messages.len();
            info!(identity = %context.identity(), count, "Loaded history");
            context.store_mut().replace_all(messages);
            state.last_error = None;
            Ok(LoadOutcome::Loaded(count))
        }
        Err(e) => {
            state.last_error = e.kind();
            Err(e)
        }
    }
}
