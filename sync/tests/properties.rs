//! Property tests for the session invariants: the voted flag is monotonic,
//! dropped intents change nothing, a confirmed vote adds exactly one to the
//! chosen candidate, and a failed one changes no tally.

use std::sync::Arc;

use proptest::prelude::*;

use ballot_ledger::LedgerError;
use ballot_nullables::{NullConnector, NullIdentityResolver, NullLedger};
use ballot_sync::{SyncCore, VoteOutcome};
use ballot_types::SessionSnapshot;

const VOTER: &str = "0x00000000000000000000000000000000000a1234";

/// One attempted vote: the candidate index and whether the ledger should
/// refuse the submission.
#[derive(Clone, Debug)]
struct Attempt {
    index: usize,
    fail: bool,
}

fn attempts() -> impl Strategy<Value = Vec<Attempt>> {
    prop::collection::vec(
        (0usize..6, any::<bool>()).prop_map(|(index, fail)| Attempt { index, fail }),
        1..8,
    )
}

fn tallies() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1_000, 1..5)
}

/// Replay `attempts` against a fresh session and record each transition.
fn replay(
    counts: &[u64],
    already_voted: bool,
    attempts: &[Attempt],
) -> Vec<(SessionSnapshot, Attempt, VoteOutcome, SessionSnapshot)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let names: Vec<String> = (0..counts.len()).map(|i| format!("C{i}")).collect();
        let entries: Vec<(&str, u64)> = names
            .iter()
            .map(String::as_str)
            .zip(counts.iter().copied())
            .collect();
        let ledger = Arc::new(NullLedger::with_candidates(&entries));
        if already_voted {
            ledger.mark_voted(VOTER);
        }
        let core = SyncCore::new(
            Arc::new(NullIdentityResolver::connected(VOTER)),
            Arc::new(NullConnector::new(ledger.clone())),
        );
        core.initialize().await;

        let mut log = Vec::new();
        for attempt in attempts {
            if attempt.fail {
                ledger.fail_next_submission(LedgerError::UserRejected);
            }
            let before = core.snapshot();
            let outcome = core.request_vote(attempt.index).await;
            let after = core.snapshot();
            log.push((before, attempt.clone(), outcome, after));
        }
        log
    })
}

proptest! {
    /// Once the session has voted it stays voted.
    #[test]
    fn has_voted_is_monotonic(counts in tallies(), voted in any::<bool>(), attempts in attempts()) {
        let log = replay(&counts, voted, &attempts);
        for (before, _, _, after) in &log {
            prop_assert!(!before.has_voted || after.has_voted);
        }
    }

    /// Intents that fail a local precondition leave the session untouched.
    #[test]
    fn dropped_intents_have_no_effect(counts in tallies(), voted in any::<bool>(), attempts in attempts()) {
        let log = replay(&counts, voted, &attempts);
        for (before, attempt, outcome, after) in &log {
            if before.has_voted || attempt.index >= before.candidates.len() {
                prop_assert!(matches!(outcome, VoteOutcome::Dropped(_)));
            }
            if matches!(outcome, VoteOutcome::Dropped(_)) {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// A confirmed vote adds exactly one to the chosen candidate and nothing else.
    #[test]
    fn confirmed_vote_adds_exactly_one(counts in tallies(), attempts in attempts()) {
        let log = replay(&counts, false, &attempts);
        for (before, attempt, outcome, after) in &log {
            if outcome.is_confirmed() {
                for (i, (b, a)) in before.candidates.iter().zip(&after.candidates).enumerate() {
                    let expected = if i == attempt.index { b.vote_count + 1 } else { b.vote_count };
                    prop_assert_eq!(a.vote_count, expected);
                }
                prop_assert!(after.has_voted);
            }
        }
    }

    /// A failed submission changes neither tallies nor the voted flag.
    #[test]
    fn failed_vote_changes_nothing_durable(counts in tallies(), attempts in attempts()) {
        let log = replay(&counts, false, &attempts);
        for (before, _, outcome, after) in &log {
            if matches!(outcome, VoteOutcome::Failed(_)) {
                prop_assert_eq!(&before.candidates, &after.candidates);
                prop_assert_eq!(before.has_voted, after.has_voted);
                prop_assert!(after.phase.accepts_votes());
            }
        }
    }
}
