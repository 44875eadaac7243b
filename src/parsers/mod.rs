//! Decoders for conversation service payloads
//!
//! # Error Handling Strategy
//!
//! History bodies follow a **graceful degradation** approach:
//!
//! - **Individual entry failures**: Malformed entries are logged via `tracing` and skipped, so a
//!   single bad row does not hide the rest of the conversation.
//!
//! - **Duplicate ids**: Later entries repeating an id are dropped, keeping the store's
//!   id-uniqueness invariant intact.
//!
//! - **Catastrophic failure detection**: If >50% of entries fail to parse, the whole payload is
//!   rejected as [`ServiceError::Decode`](crate::error::ServiceError::Decode).
//!
//! Send responses are strict: the turn pair either validates completely or is rejected, since a
//! half-valid pair cannot be reconciled.

pub mod deserializers;
pub mod exchange;
pub mod history;

pub use exchange::parse_send_response;
pub use history::parse_history_payload;
