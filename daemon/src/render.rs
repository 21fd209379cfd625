//! Plain-text rendering of a session snapshot.

use ballot_types::{Phase, SessionSnapshot};

const TITLE: &str = "Indian PM Election Voting";

/// Render `snap` the way the terminal shows it.
pub fn render(snap: &SessionSnapshot) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len())];

    if snap.phase == Phase::Initializing {
        lines.push("Loading...".to_string());
        return lines.join("\n");
    }

    if let Some(message) = snap.error_message() {
        lines.push(format!("! {message}"));
    }

    match &snap.identity {
        Some(identity) => lines.push(format!("Connected: {}", identity.short())),
        None => lines.push("Please connect your wallet to vote.".to_string()),
    }

    if snap.has_voted {
        lines.push("Thank you for voting!".to_string());
    }
    // Past the early return the only loading phase is an in-flight vote.
    if snap.is_loading() {
        lines.push("Submitting vote...".to_string());
    }

    if !snap.candidates.is_empty() {
        lines.push(String::new());
    }
    let width = snap
        .candidates
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);
    for (index, candidate) in snap.candidates.iter().enumerate() {
        lines.push(format!(
            "[{index}] {:<width$}  Votes: {}",
            candidate.name, candidate.vote_count
        ));
    }
    if snap.can_vote() {
        lines.push(String::new());
        lines.push("Enter a candidate number to vote.".to_string());
    }

    lines.join("\n")
}
