use proptest::prelude::*;

use ballot_types::{Candidate, Identity, Phase, SessionSnapshot};

proptest! {
    /// Abbreviated identities keep the first six and last four characters.
    #[test]
    fn identity_short_keeps_ends(raw in "0x[0-9a-fA-F]{40}") {
        let id = Identity::new(raw.clone());
        let short = id.short();
        prop_assert_eq!(short.len(), 13);
        prop_assert!(short.starts_with(&raw[..6]));
        prop_assert!(short.ends_with(&raw[raw.len() - 4..]));
    }

    /// Short strings are never abbreviated.
    #[test]
    fn identity_short_is_identity_for_short_input(raw in "[a-z0-9]{0,10}") {
        let id = Identity::new(raw.clone());
        prop_assert_eq!(id.short(), raw);
    }

    /// total_votes is the plain sum of every displayed tally.
    #[test]
    fn total_votes_is_sum(counts in prop::collection::vec(0u64..1_000_000, 0..16)) {
        let snap = SessionSnapshot {
            identity: None,
            candidates: counts
                .iter()
                .enumerate()
                .map(|(i, c)| Candidate::new(format!("C{i}"), *c))
                .collect(),
            has_voted: false,
            phase: Phase::Ready { voted: false },
            error: None,
        };
        prop_assert_eq!(snap.total_votes(), counts.iter().sum::<u64>());
    }
}
