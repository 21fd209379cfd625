//! Wallet identity as reported by the wallet provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters kept by [`Identity::short`].
const SHORT_HEAD: usize = 6;

/// Number of trailing characters kept by [`Identity::short`].
const SHORT_TAIL: usize = 4;

/// The address of the connected wallet.
///
/// Treated as opaque by the client: the ledger is the only party that
/// interprets it. Obtained once per session and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a raw address string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `0xAbC1...1234`.
    ///
    /// Addresses too short to abbreviate are returned unchanged.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= SHORT_HEAD + SHORT_TAIL {
            return self.0.clone();
        }
        let head: String = chars[..SHORT_HEAD].iter().collect();
        let tail: String = chars[chars.len() - SHORT_TAIL..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
