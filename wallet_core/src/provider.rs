//! Wallet provider reached over JSON-RPC.

use async_trait::async_trait;
use ballot_rpc::RpcClient;
use ballot_types::Identity;
use serde_json::json;
use tracing::{debug, info};

use crate::error::IdentityError;
use crate::resolver::IdentityResolver;

/// Resolves the identity with `eth_requestAccounts`.
///
/// Constructed without an endpoint it reports no provider, mirroring a
/// browser without a wallet extension.
pub struct RpcWalletProvider {
    rpc: Option<RpcClient>,
}

impl RpcWalletProvider {
    /// Build a provider for `endpoint`, or an absent one for `None`.
    pub fn new(endpoint: Option<&str>) -> Result<Self, IdentityError> {
        let rpc = endpoint
            .map(RpcClient::new)
            .transpose()
            .map_err(|e| IdentityError::Provider(e.to_string()))?;
        Ok(Self { rpc })
    }

    /// A provider that is never available.
    pub fn absent() -> Self {
        Self { rpc: None }
    }
}

#[async_trait]
impl IdentityResolver for RpcWalletProvider {
    fn provider_available(&self) -> bool {
        self.rpc.is_some()
    }

    async fn resolve_identity(&self) -> Result<Identity, IdentityError> {
        let rpc = self.rpc.as_ref().ok_or(IdentityError::NoWalletProvider)?;
        debug!(provider = rpc.url(), "requesting wallet accounts");

        let accounts: Vec<String> = rpc
            .call("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| {
                if e.is_user_rejection() {
                    IdentityError::UserRejected
                } else {
                    IdentityError::Provider(e.to_string())
                }
            })?;

        let account = accounts
            .into_iter()
            .next()
            .ok_or(IdentityError::UserRejected)?;
        let identity = Identity::new(account);
        info!(identity = %identity.short(), "wallet connected");
        Ok(identity)
    }
}
