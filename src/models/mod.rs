//! Data models for the conversation service.
//!
//! This module defines the data structures shared by the store, the sync engine and the
//! presentation layer:
//!
//! - [`Message`] - A single turn half, either provisional (client-created) or confirmed
//! - [`MessageId`] - Tagged id keeping the provisional and confirmed namespaces apart
//! - [`Role`] - Who authored a message
//! - [`SendRequest`] / [`SendResponse`] - Payloads of the send endpoint
//!
//! Wire decoding of ids and timestamps goes through custom deserializers in the
//! `parsers::deserializers` module, which accept the shapes the service is known to emit.

pub mod exchange;
pub mod message;

pub use exchange::{SendRequest, SendResponse};
pub use message::{Message, MessageId, Role};
