//! Chat Sync - conversation synchronization engine for an email-keyed chat client
//!
//! This library keeps a local view of a conversation in step with a remote conversation
//! service. It supports:
//!
//! - Loading the full history for a session identity (an email address)
//! - Optimistic sends: the user's message shows immediately as a provisional record, then is
//!   reconciled with the server's confirmed pair or rolled back on failure
//! - Stale-response protection when the identity changes mid-request
//! - Day-grouped presentation views ("Today", "Yesterday", DD/MM/YYYY)
//!
//! # Example
//!
//! ```no_run
//! use chat_sync::{ChatSession, ClientConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let session = ChatSession::from_config(&config)?;
//! session.select_identity("alice@example.com").await?;
//! session.send("Hello!").await?;
//! for row in session.view().rows {
//!     println!("{} {}", row.time, row.message.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod presentation;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use config::{ClientConfig, SendOrdering};
pub use error::{ChatError, ErrorKind, ServiceError, StoreError};
pub use models::{Message, MessageId, Role};
pub use presentation::{ConversationView, label_for, should_insert_separator};
pub use service::ConversationService;
pub use session::Identity;
pub use store::ConversationStore;
pub use sync::{ChatSession, LoadOutcome, SendOutcome};
