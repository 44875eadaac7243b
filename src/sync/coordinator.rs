//! Optimistic send protocol.
//!
//! A send moves through `Idle -> Pending -> {Confirmed, RolledBack} -> Idle`:
//!
//! 1. [`begin_send`] appends a provisional user record and clears the input buffer
//! 2. [`SendCoordinator::dispatch`] performs the request without touching session state
//! 3. [`finish_send`] reconciles the confirmed pair in place of the provisional record, or
//!    rolls it back and records `SendFailed`
//!
//! Steps 1 and 3 run under the session lock and never interleave; step 2 is the only await
//! point, so completions of concurrent sends land in whatever order the network delivers them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use super::state::SessionState;
use crate::error::{ChatError, ErrorKind, ServiceError, StoreError};
use crate::models::{Message, MessageId, SendResponse};
use crate::service::ConversationService;
use crate::session::Identity;

/// Bookkeeping for one send between its begin and finish steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub provisional_id: MessageId,
    pub content: String,
    pub identity: Identity,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send after trimming
    Ignored,
    /// The provisional record was replaced by the confirmed pair
    Confirmed { user: Message, assistant: Message },
    /// Confirmed, but the provisional record was already gone (a history reload wiped it)
    Orphaned,
    /// The identity changed while the request was in flight
    Discarded,
}

#[derive(Clone)]
pub struct SendCoordinator {
    service: Arc<dyn ConversationService>,
}

impl SendCoordinator {
    pub fn new(service: Arc<dyn ConversationService>) -> Self {
        Self { service }
    }

    pub async fn dispatch(&self, pending: &PendingSend) -> Result<SendResponse, ServiceError> {
        self.service.send_message(&pending.content, &pending.identity).await
    }
}

/// Idle -> Pending. Returns `None` when the trimmed text is empty.
pub(crate) fn begin_send(
    state: &mut SessionState,
    text: &str,
) -> Result<Option<PendingSend>, ChatError> {
    let content = text.trim();
    if content.is_empty() {
        return Ok(None);
    }

    let context = state.context.as_mut().ok_or(ChatError::NoIdentity)?;
    let now = Utc::now();
    let provisional_id = state.ids.next_id(now);
    let message = Message::provisional(provisional_id.clone(), content, now, context.identity());

    if let Err(e) = context.store_mut().append_provisional(message) {
        error!("Provisional id collided with an existing record: {}", e);
        return Err(e.into());
    }
    context.send_started();

    // Only a send of the buffered draft consumes it; it is not restored if the send fails
    if state.input.trim() == content {
        state.input.clear();
    }
    state.last_error = None;

    debug!(id = %provisional_id, "Send pending");
    Ok(Some(PendingSend {
        provisional_id,
        content: content.to_string(),
        identity: context.identity().clone(),
        epoch: context.epoch(),
    }))
}

/// Pending -> Confirmed | RolledBack, or a no-op for a stale session
pub(crate) fn finish_send(
    state: &mut SessionState,
    pending: PendingSend,
    result: Result<SendResponse, ServiceError>,
) -> Result<SendOutcome, ChatError> {
    let Some(context) = state.context.as_mut().filter(|c| c.epoch() == pending.epoch) else {
        debug!(id = %pending.provisional_id, "Discarding send completion for a previous session");
        return Ok(SendOutcome::Discarded);
    };
    context.send_settled();
    state.focus_requested = true;

    match result {
        Ok(SendResponse { user_message, ai_message, .. }) => {
            let confirmed = [user_message.clone(), ai_message.clone()];
            match context.store_mut().reconcile(&pending.provisional_id, confirmed) {
                Ok(()) => {
                    debug!(id = %pending.provisional_id, user = %user_message.id, "Send confirmed");
                    Ok(SendOutcome::Confirmed { user: user_message, assistant: ai_message })
                }
                Err(StoreError::NotFound(id)) => {
                    debug!(id = %id, "Provisional record gone before confirmation");
                    Ok(SendOutcome::Orphaned)
                }
                Err(e) => {
                    error!("Confirmed pair clashes with existing records: {}", e);
                    context.store_mut().rollback(&pending.provisional_id);
                    Err(e.into())
                }
            }
        }
        Err(source) => {
            warn!(id = %pending.provisional_id, "Send failed: {}", source);
            context.store_mut().rollback(&pending.provisional_id);
            state.last_error = Some(ErrorKind::SendFailed);
            Err(ChatError::SendFailed { source })
        }
    }
}
