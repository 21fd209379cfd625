//! The session state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use ballot_ledger::{Confirmation, EthConnector, LedgerClient, LedgerConnector, LedgerError};
use ballot_types::{Phase, SessionError, SessionSnapshot, VoteRejection};
use ballot_utils::format_duration;
use ballot_wallet::{IdentityError, IdentityResolver, RpcWalletProvider};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::ConfigError;
use crate::vote::{apply_optimistic_vote, check_vote, VoteOutcome};

/// Cap on up-front allocation for the candidate list; the ledger's count is
/// not trusted for sizing.
const MAX_PREALLOCATED_CANDIDATES: usize = 64;

/// Orchestrates identity resolution and ledger access for one session.
///
/// The core is the only writer of the session state. Observers get
/// snapshots through [`subscribe`](Self::subscribe) or
/// [`snapshot`](Self::snapshot).
pub struct SyncCore {
    resolver: Arc<dyn IdentityResolver>,
    connector: Arc<dyn LedgerConnector>,
    state: watch::Sender<SessionSnapshot>,
    ledger: OnceLock<Arc<dyn LedgerClient>>,
    started: AtomicBool,
    confirmation_timeout: Option<Duration>,
}

impl SyncCore {
    pub fn new(resolver: Arc<dyn IdentityResolver>, connector: Arc<dyn LedgerConnector>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initializing());
        Self {
            resolver,
            connector,
            state,
            ledger: OnceLock::new(),
            started: AtomicBool::new(false),
            confirmation_timeout: None,
        }
    }

    /// Bound the wait for a vote confirmation. An expired wait is reported
    /// as a failed submission.
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }

    /// Wire the JSON-RPC wallet provider and Ethereum ledger from `config`.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        let resolver = RpcWalletProvider::new(config.wallet_provider.as_deref())
            .map_err(|e| ConfigError::Provider(e.to_string()))?;
        let connector = EthConnector::new(&config.ledger_endpoint, &config.registry_address)
            .with_poll_interval(config.receipt_poll_interval());
        let core = Self::new(Arc::new(resolver), Arc::new(connector));
        Ok(match config.confirmation_timeout() {
            Some(timeout) => core.with_confirmation_timeout(timeout),
            None => core,
        })
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// The current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Resolve the identity and load the ledger state.
    ///
    /// Runs once per session; later calls return the current snapshot
    /// without doing anything. Any failure leaves the session in
    /// [`Phase::Error`] with no candidates shown.
    pub async fn initialize(&self) -> SessionSnapshot {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("session already initialized");
            return self.snapshot();
        }

        match self.load().await {
            Ok(()) => {
                let snap = self.snapshot();
                info!(
                    candidates = snap.candidates.len(),
                    has_voted = snap.has_voted,
                    "session ready"
                );
            }
            Err(err) => {
                error!(error = %err, "session initialization failed");
                self.state.send_modify(|s| {
                    s.candidates.clear();
                    s.phase = Phase::Error;
                    s.error = Some(err);
                });
            }
        }
        self.snapshot()
    }

    async fn load(&self) -> Result<(), SessionError> {
        if !self.resolver.provider_available() {
            return Err(SessionError::NoWalletProvider);
        }

        let identity = self
            .resolver
            .resolve_identity()
            .await
            .map_err(identity_failure)?;
        self.state
            .send_modify(|s| s.identity = Some(identity.clone()));

        let ledger = self
            .connector
            .connect(&identity)
            .await
            .map_err(connection_failure)?;

        let count = ledger.candidate_count().await.map_err(connection_failure)?;
        let mut candidates = Vec::with_capacity(count.min(MAX_PREALLOCATED_CANDIDATES));
        for index in 0..count {
            candidates.push(
                ledger
                    .candidate_votes(index)
                    .await
                    .map_err(connection_failure)?,
            );
        }

        let has_voted = ledger
            .has_voted(&identity)
            .await
            .map_err(connection_failure)?;

        if self.ledger.set(ledger).is_err() {
            warn!("ledger client was already bound");
        }
        self.state.send_modify(|s| {
            s.candidates = candidates;
            s.has_voted = has_voted;
            s.phase = Phase::Ready { voted: has_voted };
            s.error = None;
        });
        Ok(())
    }

    /// Cast the session's vote for the candidate at `index`.
    ///
    /// Only accepted in `Ready { voted: false }`; anything else is dropped
    /// without touching the session. Entering [`Phase::Submitting`] is the
    /// lock that keeps a second request out until this one resolves.
    pub async fn request_vote(&self, index: usize) -> VoteOutcome {
        let Some(ledger) = self.ledger.get().cloned() else {
            debug!(index, "vote dropped: ledger not connected");
            return VoteOutcome::Dropped(VoteRejection::NotConnected);
        };

        let mut rejection = None;
        self.state.send_if_modified(|s| match check_vote(s, index) {
            Ok(()) => {
                s.phase = Phase::Submitting;
                s.error = None;
                true
            }
            Err(reason) => {
                rejection = Some(reason);
                false
            }
        });
        if let Some(reason) = rejection {
            debug!(index, %reason, "vote dropped");
            return VoteOutcome::Dropped(reason);
        }

        info!(index, "submitting vote");
        let started = Instant::now();
        match self.cast(ledger.as_ref(), index).await {
            Ok(confirmation) => {
                info!(
                    index,
                    hash = %confirmation.hash,
                    elapsed = %format_duration(started.elapsed()),
                    "vote confirmed"
                );
                self.state.send_modify(|s| {
                    s.has_voted = true;
                    apply_optimistic_vote(&mut s.candidates, index);
                    s.phase = Phase::Ready { voted: true };
                });
                VoteOutcome::Confirmed(confirmation)
            }
            Err(err) => {
                error!(index, error = %err, "vote submission failed");
                let failure = SessionError::VoteSubmissionError(err.to_string());
                self.state.send_modify(|s| {
                    s.phase = Phase::Ready { voted: false };
                    s.error = Some(failure.clone());
                });
                VoteOutcome::Failed(failure)
            }
        }
    }

    async fn cast(
        &self,
        ledger: &dyn LedgerClient,
        index: usize,
    ) -> Result<Confirmation, LedgerError> {
        let pending = ledger.submit_vote(index).await?;
        let confirmation = ledger.await_confirmation(pending);
        match self.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, confirmation)
                .await
                .map_err(|_| LedgerError::Timeout)?,
            None => confirmation.await,
        }
    }
}

fn identity_failure(err: IdentityError) -> SessionError {
    match err {
        IdentityError::NoWalletProvider => SessionError::NoWalletProvider,
        IdentityError::UserRejected => SessionError::UserRejected,
        IdentityError::Provider(detail) => SessionError::ConnectionError(detail),
    }
}

fn connection_failure(err: LedgerError) -> SessionError {
    SessionError::ConnectionError(err.to_string())
}
