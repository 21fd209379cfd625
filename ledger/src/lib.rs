//! Ledger client for the candidate registry.
//!
//! The registry is a contract on an Ethereum-compatible chain exposing four
//! functions: the candidate count, per-index `(name, votes)`, the per-address
//! voted flag, and `vote(index)`. The ledger, not this client, is the
//! authority on tallies and on double-vote prevention.
//!
//! [`LedgerClient`] is the seam the synchronization core consumes;
//! [`EthLedgerClient`] implements it over JSON-RPC.

pub mod abi;
pub mod client;
pub mod error;
pub mod eth;

pub use client::{Confirmation, LedgerClient, LedgerConnector, PendingTransaction};
pub use error::LedgerError;
pub use eth::{EthConnector, EthLedgerClient};
