//! Nullable wallet provider.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ballot_types::Identity;
use ballot_wallet::{IdentityError, IdentityResolver};

enum Mode {
    Connected(Identity),
    Absent,
    Failing(IdentityError),
}

/// A wallet provider with a scripted answer.
pub struct NullIdentityResolver {
    mode: Mode,
    resolve_calls: AtomicUsize,
}

impl NullIdentityResolver {
    /// A provider that hands out `identity`.
    pub fn connected(identity: impl Into<Identity>) -> Self {
        Self::with_mode(Mode::Connected(identity.into()))
    }

    /// No wallet installed.
    pub fn absent() -> Self {
        Self::with_mode(Mode::Absent)
    }

    /// The wallet holder declines the account request.
    pub fn rejecting() -> Self {
        Self::with_mode(Mode::Failing(IdentityError::UserRejected))
    }

    /// The provider is present but broken.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_mode(Mode::Failing(IdentityError::Provider(reason.into())))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            resolve_calls: AtomicUsize::new(0),
        }
    }

    /// How many times resolution was requested.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for NullIdentityResolver {
    fn provider_available(&self) -> bool {
        !matches!(self.mode, Mode::Absent)
    }

    async fn resolve_identity(&self) -> Result<Identity, IdentityError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            Mode::Connected(identity) => Ok(identity.clone()),
            Mode::Absent => Err(IdentityError::NoWalletProvider),
            Mode::Failing(err) => Err(err.clone()),
        }
    }
}
