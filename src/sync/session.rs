use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate, TimeZone};

use super::coordinator::{SendCoordinator, SendOutcome, begin_send, finish_send};
use super::loader::{HistoryLoader, LoadOutcome, apply_history};
use super::state::SessionState;
use crate::config::{ClientConfig, SendOrdering};
use crate::error::{ChatError, ErrorKind, ServiceError};
use crate::models::Message;
use crate::presentation::ConversationView;
use crate::service::{ConversationService, HttpConversationService};
use crate::session::Identity;

/// Handle to the synchronization engine for one process.
///
/// Cloning is cheap and every clone drives the same session, so several sends can be in flight
/// at once (e.g. via `tokio::join!`). State is only touched between await points.
#[derive(Clone)]
pub struct ChatSession {
    state: Arc<Mutex<SessionState>>,
    loader: HistoryLoader,
    coordinator: SendCoordinator,
    ordering: SendOrdering,
}

impl ChatSession {
    pub fn new(service: Arc<dyn ConversationService>, ordering: SendOrdering) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            loader: HistoryLoader::new(Arc::clone(&service)),
            coordinator: SendCoordinator::new(service),
            ordering,
        }
    }

    /// Session talking HTTP to the backend described by `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        let service = HttpConversationService::new(config)?;
        Ok(Self::new(Arc::new(service), config.send_ordering))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ordering(&self) -> SendOrdering {
        self.ordering
    }

    pub fn identity(&self) -> Option<Identity> {
        self.lock().context().map(|c| c.identity().clone())
    }

    /// Validate `raw` and swap in an empty context for it, without loading history
    pub fn switch_identity(&self, raw: &str) -> Result<Identity, ChatError> {
        let mut state = self.lock();
        match Identity::parse(raw) {
            Ok(identity) => {
                state.switch_to(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                state.last_error = e.kind();
                Err(e)
            }
        }
    }

    /// Switch identity and load its history
    pub async fn select_identity(&self, raw: &str) -> Result<LoadOutcome, ChatError> {
        self.switch_identity(raw)?;
        self.reload().await
    }

    /// Leave the current conversation ("new chat"); pending completions become stale
    pub fn clear_identity(&self) {
        self.lock().clear();
    }

    /// Fetch history for the active identity and replace the store with it
    pub async fn reload(&self) -> Result<LoadOutcome, ChatError> {
        let (identity, epoch) = {
            let state = self.lock();
            let context = state.context().ok_or(ChatError::NoIdentity)?;
            (context.identity().clone(), context.epoch())
        };

        let result = self.loader.load(&identity).await;

        let mut state = self.lock();
        apply_history(&mut state, epoch, result)
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Send whatever is in the input buffer
    pub async fn submit(&self) -> Result<SendOutcome, ChatError> {
        let text = self.input();
        self.send(&text).await
    }

    /// Run the optimistic send protocol for `text`
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ChatError> {
        let (pending, queue) = {
            let mut state = self.lock();
            match begin_send(&mut state, text)? {
                Some(pending) => {
                    let queue = state.context().map(|c| c.send_queue());
                    (pending, queue)
                }
                None => return Ok(SendOutcome::Ignored),
            }
        };

        // Held through finish so the store sees completions in issue order. The queue belongs
        // to the context, so sends of a previous identity never hold up the current one.
        let _turn = match (self.ordering, &queue) {
            (SendOrdering::Serialized, Some(queue)) => Some(queue.lock().await),
            _ => None,
        };

        let result = self.coordinator.dispatch(&pending).await;

        let mut state = self.lock();
        finish_send(&mut state, pending, result)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().context().map(|c| c.store().messages().to_vec()).unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().context().is_some_and(|c| c.is_busy())
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.lock().last_error
    }

    pub fn dismiss_error(&self) {
        self.lock().last_error = None;
    }

    /// True once after each settled send: the input field should regain focus
    pub fn take_focus_request(&self) -> bool {
        std::mem::take(&mut self.lock().focus_requested)
    }

    /// Snapshot for rendering, grouped by local calendar day
    pub fn view(&self) -> ConversationView {
        self.view_at(Local::now().date_naive(), &Local)
    }

    pub fn view_at<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> ConversationView {
        let state = self.lock();
        match state.context() {
            Some(context) => ConversationView::build(
                context.store().messages(),
                context.is_busy(),
                state.last_error,
                today,
                tz,
            ),
            None => ConversationView::build(&[], false, state.last_error, today, tz),
        }
    }
}
