use async_trait::async_trait;
use ballot_types::Identity;

use crate::error::IdentityError;

/// Source of the session's wallet identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Whether any wallet capability is present at all.
    ///
    /// Checked before [`resolve_identity`](Self::resolve_identity) so that a
    /// missing wallet fails without prompting anyone.
    fn provider_available(&self) -> bool;

    /// Ask the provider for the connected account.
    async fn resolve_identity(&self) -> Result<Identity, IdentityError>;
}
