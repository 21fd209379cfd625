//! Local vote preconditions and the optimistic tally update.

use ballot_ledger::Confirmation;
use ballot_types::{Candidate, SessionError, SessionSnapshot, VoteRejection};

/// What became of a vote request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The ledger confirmed the vote and the session now shows it.
    Confirmed(Confirmation),
    /// Submission or confirmation failed; the session is back in
    /// `Ready { voted: false }` with the error attached.
    Failed(SessionError),
    /// A local precondition did not hold. Nothing was sent and the session
    /// state is untouched.
    Dropped(VoteRejection),
}

impl VoteOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, VoteOutcome::Confirmed(_))
    }
}

/// Client-side gate in front of the ledger's own double-vote check.
pub(crate) fn check_vote(session: &SessionSnapshot, index: usize) -> Result<(), VoteRejection> {
    if session.identity.is_none() {
        return Err(VoteRejection::NotConnected);
    }
    if session.has_voted {
        return Err(VoteRejection::AlreadyVoted);
    }
    if index >= session.candidates.len() {
        return Err(VoteRejection::OutOfRangeIndex {
            index,
            count: session.candidates.len(),
        });
    }
    if !session.phase.accepts_votes() {
        return Err(VoteRejection::Busy);
    }
    Ok(())
}

/// Display approximation applied after a confirmed vote.
///
/// Adds exactly one to the chosen candidate. The tally is not re-read from
/// the ledger, so other voters' concurrent votes are not reflected until the
/// next session.
pub(crate) fn apply_optimistic_vote(candidates: &mut [Candidate], index: usize) {
    if let Some(candidate) = candidates.get_mut(index) {
        candidate.vote_count = candidate.vote_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{Identity, Phase};

    fn ready() -> SessionSnapshot {
        SessionSnapshot {
            identity: Some(Identity::new("0xabc")),
            candidates: vec![
                Candidate::new("MODI", 10),
                Candidate::new("RAHUL", 8),
                Candidate::new("KEJRIWAL", 5),
            ],
            has_voted: false,
            phase: Phase::Ready { voted: false },
            error: None,
        }
    }

    #[test]
    fn accepts_in_range_vote_when_ready() {
        assert_eq!(check_vote(&ready(), 0), Ok(()));
        assert_eq!(check_vote(&ready(), 2), Ok(()));
    }

    #[test]
    fn rejects_each_precondition() {
        let mut anonymous = ready();
        anonymous.identity = None;
        assert_eq!(check_vote(&anonymous, 0), Err(VoteRejection::NotConnected));

        let mut voted = ready();
        voted.has_voted = true;
        voted.phase = Phase::Ready { voted: true };
        assert_eq!(check_vote(&voted, 0), Err(VoteRejection::AlreadyVoted));

        assert_eq!(
            check_vote(&ready(), 3),
            Err(VoteRejection::OutOfRangeIndex { index: 3, count: 3 })
        );

        let mut submitting = ready();
        submitting.phase = Phase::Submitting;
        assert_eq!(check_vote(&submitting, 1), Err(VoteRejection::Busy));
    }

    #[test]
    fn optimistic_vote_touches_only_the_chosen_candidate() {
        let mut candidates = ready().candidates;
        apply_optimistic_vote(&mut candidates, 1);
        let counts: Vec<u64> = candidates.iter().map(|c| c.vote_count).collect();
        assert_eq!(counts, vec![10, 9, 5]);
    }

    #[test]
    fn optimistic_vote_ignores_unknown_index() {
        let mut candidates = ready().candidates;
        apply_optimistic_vote(&mut candidates, 7);
        assert_eq!(candidates, ready().candidates);
    }
}
