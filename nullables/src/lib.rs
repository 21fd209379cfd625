//! Nullable infrastructure for deterministic testing.
//!
//! The synchronization core only reaches the outside world through the
//! identity resolver and the ledger client. This crate provides test-friendly
//! implementations of both that:
//! - Return deterministic values
//! - Can be told to fail, revert, or hold a transaction in flight
//! - Never touch the network
//!
//! Usage: hand these to `SyncCore::new` in place of the real provider and
//! connector.

pub mod identity;
pub mod ledger;

pub use identity::NullIdentityResolver;
pub use ledger::{NullConnector, NullLedger};
