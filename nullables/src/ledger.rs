//! Nullable ledger — an in-memory candidate registry.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ballot_ledger::{
    Confirmation, LedgerClient, LedgerConnector, LedgerError, PendingTransaction,
};
use ballot_types::{Candidate, Identity};
use tokio::sync::Semaphore;

#[derive(Default)]
struct Registry {
    candidates: Vec<Candidate>,
    voters: HashSet<Identity>,
    bound: Option<Identity>,
    pending: HashMap<String, usize>,
    next_tx: u64,
    fail_count: Option<LedgerError>,
    fail_candidate: Option<(usize, LedgerError)>,
    fail_has_voted: Option<LedgerError>,
    fail_next_submission: Option<LedgerError>,
    revert_next: bool,
    hold_confirmations: bool,
}

#[derive(Default)]
struct Calls {
    candidate_count: AtomicUsize,
    candidate_votes: AtomicUsize,
    has_voted: AtomicUsize,
    submit_vote: AtomicUsize,
    await_confirmation: AtomicUsize,
}

/// An in-memory registry standing in for the ledger.
///
/// It is authoritative the way the real contract is: a confirmed vote bumps
/// the stored tally and marks the bound identity as having voted, and a
/// second vote from the same identity reverts.
pub struct NullLedger {
    registry: Mutex<Registry>,
    calls: Calls,
    releases: Semaphore,
}

impl NullLedger {
    /// A registry with `(name, votes)` candidates in order.
    pub fn with_candidates(candidates: &[(&str, u64)]) -> Self {
        let registry = Registry {
            candidates: candidates
                .iter()
                .map(|(name, votes)| Candidate::new(*name, *votes))
                .collect(),
            ..Default::default()
        };
        Self {
            registry: Mutex::new(registry),
            calls: Calls::default(),
            releases: Semaphore::new(0),
        }
    }

    /// Record that `identity` has already voted.
    pub fn mark_voted(&self, identity: impl Into<Identity>) {
        self.registry.lock().unwrap().voters.insert(identity.into());
    }

    /// Make `getCandidateCount` fail.
    pub fn fail_candidate_count(&self, err: LedgerError) {
        self.registry.lock().unwrap().fail_count = Some(err);
    }

    /// Make the fetch of the candidate at `index` fail.
    pub fn fail_candidate_fetch(&self, index: usize, err: LedgerError) {
        self.registry.lock().unwrap().fail_candidate = Some((index, err));
    }

    /// Make `hasVoted` fail.
    pub fn fail_has_voted(&self, err: LedgerError) {
        self.registry.lock().unwrap().fail_has_voted = Some(err);
    }

    /// Make the next vote submission fail with `err`.
    pub fn fail_next_submission(&self, err: LedgerError) {
        self.registry.lock().unwrap().fail_next_submission = Some(err);
    }

    /// Make the next confirmation report a revert.
    pub fn revert_next(&self) {
        self.registry.lock().unwrap().revert_next = true;
    }

    /// Keep confirmations pending until [`release_confirmation`](Self::release_confirmation).
    pub fn hold_confirmations(&self) {
        self.registry.lock().unwrap().hold_confirmations = true;
    }

    /// Let one held confirmation through.
    pub fn release_confirmation(&self) {
        self.releases.add_permits(1);
    }

    /// The authoritative tallies.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.registry.lock().unwrap().candidates.clone()
    }

    /// Identity the ledger was last bound to by a connector.
    pub fn bound_identity(&self) -> Option<Identity> {
        self.registry.lock().unwrap().bound.clone()
    }

    /// Number of read calls (count, per-candidate, voted flag) served.
    pub fn read_calls(&self) -> usize {
        self.calls.candidate_count.load(Ordering::SeqCst)
            + self.calls.candidate_votes.load(Ordering::SeqCst)
            + self.calls.has_voted.load(Ordering::SeqCst)
    }

    pub fn candidate_fetches(&self) -> usize {
        self.calls.candidate_votes.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.calls.submit_vote.load(Ordering::SeqCst)
    }

    pub fn confirmations_awaited(&self) -> usize {
        self.calls.await_confirmation.load(Ordering::SeqCst)
    }

    fn bind(&self, identity: &Identity) {
        self.registry.lock().unwrap().bound = Some(identity.clone());
    }

    fn settle(&self, pending: PendingTransaction) -> Result<Confirmation, LedgerError> {
        let mut registry = self.registry.lock().unwrap();
        let index = registry
            .pending
            .remove(&pending.hash)
            .ok_or_else(|| LedgerError::Transport(format!("unknown transaction {}", pending.hash)))?;
        if std::mem::take(&mut registry.revert_next) {
            return Err(LedgerError::Reverted { hash: pending.hash });
        }
        let voter = registry
            .bound
            .clone()
            .ok_or_else(|| LedgerError::Transport("ledger is not bound".into()))?;
        if !registry.voters.insert(voter) {
            return Err(LedgerError::Reverted { hash: pending.hash });
        }
        registry.candidates[index].vote_count += 1;
        Ok(Confirmation {
            hash: pending.hash,
            block_number: Some(registry.next_tx),
        })
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn candidate_count(&self) -> Result<usize, LedgerError> {
        self.calls.candidate_count.fetch_add(1, Ordering::SeqCst);
        let registry = self.registry.lock().unwrap();
        match &registry.fail_count {
            Some(err) => Err(err.clone()),
            None => Ok(registry.candidates.len()),
        }
    }

    async fn candidate_votes(&self, index: usize) -> Result<Candidate, LedgerError> {
        self.calls.candidate_votes.fetch_add(1, Ordering::SeqCst);
        let registry = self.registry.lock().unwrap();
        if let Some((failing, err)) = &registry.fail_candidate {
            if *failing == index {
                return Err(err.clone());
            }
        }
        registry
            .candidates
            .get(index)
            .cloned()
            .ok_or_else(|| LedgerError::Decode(format!("no candidate at {index}")))
    }

    async fn has_voted(&self, identity: &Identity) -> Result<bool, LedgerError> {
        self.calls.has_voted.fetch_add(1, Ordering::SeqCst);
        let registry = self.registry.lock().unwrap();
        match &registry.fail_has_voted {
            Some(err) => Err(err.clone()),
            None => Ok(registry.voters.contains(identity)),
        }
    }

    async fn submit_vote(&self, index: usize) -> Result<PendingTransaction, LedgerError> {
        self.calls.submit_vote.fetch_add(1, Ordering::SeqCst);
        let mut registry = self.registry.lock().unwrap();
        if let Some(err) = registry.fail_next_submission.take() {
            return Err(err);
        }
        if index >= registry.candidates.len() {
            return Err(LedgerError::Transport(format!("no candidate at {index}")));
        }
        registry.next_tx += 1;
        let hash = format!("0x{:064x}", registry.next_tx);
        registry.pending.insert(hash.clone(), index);
        Ok(PendingTransaction { hash })
    }

    async fn await_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> Result<Confirmation, LedgerError> {
        self.calls.await_confirmation.fetch_add(1, Ordering::SeqCst);
        let hold = self.registry.lock().unwrap().hold_confirmations;
        if hold {
            self.releases
                .acquire()
                .await
                .map_err(|e| LedgerError::Transport(e.to_string()))?
                .forget();
        }
        self.settle(pending)
    }
}

/// Connector that always hands out the same [`NullLedger`].
pub struct NullConnector {
    ledger: Arc<NullLedger>,
    connect_error: Option<LedgerError>,
}

impl NullConnector {
    pub fn new(ledger: Arc<NullLedger>) -> Self {
        Self {
            ledger,
            connect_error: None,
        }
    }

    /// A connector whose `connect` fails.
    pub fn failing(ledger: Arc<NullLedger>, err: LedgerError) -> Self {
        Self {
            ledger,
            connect_error: Some(err),
        }
    }
}

#[async_trait]
impl LedgerConnector for NullConnector {
    async fn connect(&self, identity: &Identity) -> Result<Arc<dyn LedgerClient>, LedgerError> {
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }
        self.ledger.bind(identity);
        Ok(self.ledger.clone())
    }
}
