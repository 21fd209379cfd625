//! Session phase and the immutable snapshot handed to observers.

use serde::Serialize;

use crate::candidate::Candidate;
use crate::error::SessionError;
use crate::identity::Identity;

/// Where the session currently is in its connect/vote lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Identity and ledger state are being loaded.
    Initializing,
    /// Ledger state is loaded. `voted` mirrors the session's voted flag.
    Ready { voted: bool },
    /// A vote transaction is in flight; no further intents are accepted.
    Submitting,
    /// Initialization failed; the session cannot proceed.
    Error,
}

impl Phase {
    /// The only phase in which a vote intent is accepted.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Ready { voted: false })
    }
}

/// A point-in-time view of the session.
///
/// A new snapshot is published on every transition; observers never hold a
/// handle through which the session could be mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    /// Candidates in registry order. Empty until initialization completes.
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
    pub phase: Phase,
    pub error: Option<SessionError>,
}

impl SessionSnapshot {
    /// The state a session starts in.
    pub fn initializing() -> Self {
        Self {
            identity: None,
            candidates: Vec::new(),
            has_voted: false,
            phase: Phase::Initializing,
            error: None,
        }
    }

    /// Whether a vote button would be enabled.
    pub fn can_vote(&self) -> bool {
        self.identity.is_some() && !self.has_voted && self.phase.accepts_votes()
    }

    /// Whether a spinner would be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Initializing | Phase::Submitting)
    }

    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Sum of all displayed tallies.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }

    /// The user-facing error message, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(SessionError::message)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initializing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(voted: bool) -> SessionSnapshot {
        SessionSnapshot {
            identity: Some(Identity::new("0xabc")),
            candidates: vec![Candidate::new("MODI", 10), Candidate::new("RAHUL", 8)],
            has_voted: voted,
            phase: Phase::Ready { voted },
            error: None,
        }
    }

    #[test]
    fn fresh_session_is_loading_and_cannot_vote() {
        let snap = SessionSnapshot::initializing();
        assert!(snap.is_loading());
        assert!(!snap.can_vote());
    }

    #[test]
    fn can_vote_only_when_ready_and_not_voted() {
        assert!(ready(false).can_vote());
        assert!(!ready(true).can_vote());

        let mut submitting = ready(false);
        submitting.phase = Phase::Submitting;
        assert!(!submitting.can_vote());
        assert!(submitting.is_loading());

        let mut anonymous = ready(false);
        anonymous.identity = None;
        assert!(!anonymous.can_vote());
    }

    #[test]
    fn total_votes_sums_tallies() {
        assert_eq!(ready(false).total_votes(), 18);
        assert_eq!(ready(false).candidate(1).map(|c| c.name.as_str()), Some("RAHUL"));
        assert!(ready(false).candidate(2).is_none());
    }

    #[test]
    fn error_message_projects_flat_string() {
        let mut snap = SessionSnapshot::initializing();
        snap.phase = Phase::Error;
        snap.error = Some(SessionError::NoWalletProvider);
        assert_eq!(
            snap.error_message(),
            Some(SessionError::NoWalletProvider.message())
        );
    }
}
