//! Synchronization core.
//!
//! Owns the session state and drives it through
//! `Initializing → Ready → Submitting → Ready(voted)` (or `Error`), talking to
//! the wallet provider through an [`IdentityResolver`] and to the ledger
//! through a [`LedgerConnector`]. The presentation layer only ever sees
//! immutable [`SessionSnapshot`]s published on a watch channel, and only ever
//! acts through [`SyncCore::request_vote`].
//!
//! [`IdentityResolver`]: ballot_wallet::IdentityResolver
//! [`LedgerConnector`]: ballot_ledger::LedgerConnector
//! [`SessionSnapshot`]: ballot_types::SessionSnapshot

pub mod config;
pub mod session;
pub mod error;
pub mod vote;

pub use config::SyncConfig;
pub use session::SyncCore;
pub use error::ConfigError;
pub use vote::VoteOutcome;
