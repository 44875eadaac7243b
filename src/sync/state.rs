use super::ids::ProvisionalIdGenerator;
use crate::error::ErrorKind;
use crate::session::{Identity, SessionContext};

/// Mutable state behind a [`ChatSession`](super::ChatSession)
#[derive(Debug, Default)]
pub struct SessionState {
    pub(crate) context: Option<SessionContext>,
    pub(crate) input: String,
    pub(crate) last_error: Option<ErrorKind>,
    pub(crate) focus_requested: bool,
    pub(crate) ids: ProvisionalIdGenerator,
    last_epoch: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active context with an empty one for `identity`; returns its epoch
    pub(crate) fn switch_to(&mut self, identity: Identity) -> u64 {
        self.last_epoch += 1;
        self.context = Some(SessionContext::new(identity, self.last_epoch));
        self.last_error = None;
        self.last_epoch
    }

    /// Drop the active context. The epoch still advances so late completions stay stale.
    pub(crate) fn clear(&mut self) {
        self.last_epoch += 1;
        self.context = None;
        self.last_error = None;
    }

    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }
}
