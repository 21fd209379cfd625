//! The ledger contract consumed by the synchronization core.

use std::sync::Arc;

use async_trait::async_trait;
use ballot_types::{Candidate, Identity};

use crate::error::LedgerError;

/// Handle to a submitted but not yet finalized vote transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: String,
}

/// Finality signal for a vote transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub hash: String,
    /// Block that included the transaction, when the ledger reports it.
    pub block_number: Option<u64>,
}

/// Request/response facade over the candidate registry.
///
/// A client is bound to one identity: votes it submits are cast by that
/// identity.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Number of registered candidates.
    async fn candidate_count(&self) -> Result<usize, LedgerError>;

    /// Name and tally of the candidate at `index`.
    async fn candidate_votes(&self, index: usize) -> Result<Candidate, LedgerError>;

    /// Whether `identity` has already cast its vote.
    async fn has_voted(&self, identity: &Identity) -> Result<bool, LedgerError>;

    /// Send the vote transaction for the candidate at `index`.
    async fn submit_vote(&self, index: usize) -> Result<PendingTransaction, LedgerError>;

    /// Wait until `pending` is final. Fails with [`LedgerError::Reverted`] if
    /// the ledger refused it and [`LedgerError::Dropped`] if it vanished.
    async fn await_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> Result<Confirmation, LedgerError>;
}

/// Builds ledger clients bound to a resolved identity.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(&self, identity: &Identity) -> Result<Arc<dyn LedgerClient>, LedgerError>;
}
