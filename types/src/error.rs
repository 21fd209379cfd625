//! Session error taxonomy.

use serde::Serialize;
use thiserror::Error;

const NO_WALLET_MESSAGE: &str =
    "No Ethereum wallet detected. Please install MetaMask or another Web3 wallet.";

const CONNECTION_MESSAGE: &str = "Failed to connect to the blockchain. Please make sure you're using a Web3-enabled browser and are connected to the correct network.";

const VOTE_MESSAGE: &str = "Failed to cast your vote. Please try again.";

/// An error surfaced to the presentation layer through the session snapshot.
///
/// The `detail` payloads carry the underlying cause for logs; what the user
/// sees is always the single flat string returned by [`SessionError::message`].
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum SessionError {
    #[error("no wallet provider available")]
    NoWalletProvider,

    #[error("identity request rejected by the wallet holder")]
    UserRejected,

    #[error("ledger connection failed: {0}")]
    ConnectionError(String),

    #[error("vote submission failed: {0}")]
    VoteSubmissionError(String),
}

impl SessionError {
    /// The user-facing message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            SessionError::NoWalletProvider => NO_WALLET_MESSAGE,
            SessionError::UserRejected | SessionError::ConnectionError(_) => CONNECTION_MESSAGE,
            SessionError::VoteSubmissionError(_) => VOTE_MESSAGE,
        }
    }

    /// Whether this error ends the session's usefulness.
    ///
    /// Only a failed vote submission can be retried.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SessionError::VoteSubmissionError(_))
    }
}

/// Why a vote intent was dropped before reaching the ledger.
///
/// Rejections never alter session state and are not shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VoteRejection {
    #[error("no wallet identity is connected")]
    NotConnected,

    #[error("this identity has already voted")]
    AlreadyVoted,

    #[error("candidate index {index} out of range (count {count})")]
    OutOfRangeIndex { index: usize, count: usize },

    #[error("session is not ready to accept a vote")]
    Busy,
}
