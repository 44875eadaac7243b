//! Session identity and the per-identity context.
//!
//! - [`Identity`] - validated, normalized email address
//! - [`SessionContext`] - store plus bookkeeping for one identity, tagged with an epoch
//! - [`IdentityStore`] - persisted identity slot ([`FileIdentityStore`], [`MemoryIdentityStore`])

pub mod context;
pub mod identity;
pub mod persistence;

pub use context::SessionContext;
pub use identity::Identity;
pub use persistence::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
