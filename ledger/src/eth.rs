//! Candidate registry client over Ethereum JSON-RPC.
//!
//! Reads go through `eth_call` at the `latest` block. The vote is sent with
//! `eth_sendTransaction` so that the wallet behind the endpoint signs it
//! (and may refuse to). Inclusion is awaited with a [`PendingTransaction`]
//! watcher that polls at the configured interval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ballot_rpc::RpcClient;
use ballot_types::{Candidate, Identity};
use ethers_core::types::{Address, Bytes, TxHash, U64};
use ethers_providers::{Http, PendingTransaction as ReceiptWatcher, Provider};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::abi::{identity_address, RegistryAbi};
use crate::client::{Confirmation, LedgerClient, LedgerConnector, PendingTransaction};
use crate::error::LedgerError;

/// Default interval between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// [`LedgerClient`] for a registry contract on an Ethereum-compatible chain.
pub struct EthLedgerClient {
    rpc: RpcClient,
    provider: Provider<Http>,
    abi: RegistryAbi,
    registry: String,
    voter: Address,
    poll_interval: Duration,
}

impl EthLedgerClient {
    async fn call(&self, data: Bytes) -> Result<Bytes, LedgerError> {
        let output: Bytes = self
            .rpc
            .call(
                "eth_call",
                json!([{ "to": self.registry, "data": data }, "latest"]),
            )
            .await?;
        Ok(output)
    }
}

#[async_trait]
impl LedgerClient for EthLedgerClient {
    async fn candidate_count(&self) -> Result<usize, LedgerError> {
        let output = self.call(self.abi.candidate_count_call()?).await?;
        self.abi.decode_candidate_count(&output)
    }

    async fn candidate_votes(&self, index: usize) -> Result<Candidate, LedgerError> {
        let output = self.call(self.abi.candidate_votes_call(index)?).await?;
        self.abi.decode_candidate(&output)
    }

    async fn has_voted(&self, identity: &Identity) -> Result<bool, LedgerError> {
        let voter = identity_address(identity)?;
        let output = self.call(self.abi.has_voted_call(voter)?).await?;
        self.abi.decode_has_voted(&output)
    }

    async fn submit_vote(&self, index: usize) -> Result<PendingTransaction, LedgerError> {
        let data = self.abi.vote_call(index)?;
        let hash: TxHash = self
            .rpc
            .call(
                "eth_sendTransaction",
                json!([{ "from": self.voter, "to": self.registry, "data": data }]),
            )
            .await?;
        let hash = format!("{hash:#x}");
        info!(%hash, index, "vote transaction sent");
        Ok(PendingTransaction { hash })
    }

    async fn await_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> Result<Confirmation, LedgerError> {
        let tx_hash: TxHash = pending
            .hash
            .parse()
            .map_err(|e| LedgerError::Decode(format!("transaction hash {}: {e}", pending.hash)))?;

        debug!(hash = %pending.hash, "waiting for vote receipt");
        let receipt = ReceiptWatcher::new(tx_hash, &self.provider)
            .interval(self.poll_interval)
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let Some(receipt) = receipt else {
            warn!(hash = %pending.hash, "vote transaction dropped");
            return Err(LedgerError::Dropped { hash: pending.hash });
        };
        if receipt.status == Some(U64::zero()) {
            warn!(hash = %pending.hash, "vote transaction reverted");
            return Err(LedgerError::Reverted { hash: pending.hash });
        }

        Ok(Confirmation {
            hash: pending.hash,
            block_number: receipt.block_number.map(|n| n.as_u64()),
        })
    }
}

/// Builds [`EthLedgerClient`]s for a fixed endpoint and registry address.
#[derive(Clone, Debug)]
pub struct EthConnector {
    endpoint: String,
    registry: String,
    poll_interval: Duration,
}

impl EthConnector {
    pub fn new(endpoint: impl Into<String>, registry: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            registry: registry.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl LedgerConnector for EthConnector {
    async fn connect(&self, identity: &Identity) -> Result<Arc<dyn LedgerClient>, LedgerError> {
        // Votes are sent from this address, so it has to be a real one.
        let voter = identity_address(identity)?;
        let rpc = RpcClient::new(self.endpoint.clone())?;
        let provider = Provider::<Http>::try_from(self.endpoint.as_str())
            .map_err(|e| LedgerError::Transport(format!("{}: {e}", self.endpoint)))?
            .interval(self.poll_interval);
        debug!(endpoint = %self.endpoint, registry = %self.registry, "ledger client bound");
        Ok(Arc::new(EthLedgerClient {
            rpc,
            provider,
            abi: RegistryAbi::new()?,
            registry: self.registry.clone(),
            voter,
            poll_interval: self.poll_interval,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connector_rejects_unaddressable_identity() {
        let connector = EthConnector::new("http://127.0.0.1:8545", "0x00");
        let result = connector.connect(&Identity::new("not-an-address")).await;
        assert!(matches!(result, Err(LedgerError::InvalidIdentity(_))));
    }

    #[tokio::test]
    async fn connector_rejects_malformed_endpoint() {
        let connector = EthConnector::new("not a url", "0x00");
        let id = Identity::new("0x260471fcaB62b943247BA80934FBAbee916Ae4C8");
        assert!(matches!(
            connector.connect(&id).await,
            Err(LedgerError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn connector_binds_identity() {
        let connector = EthConnector::new("http://127.0.0.1:8545", "0x00")
            .with_poll_interval(Duration::from_millis(5));
        let id = Identity::new("0x260471fcaB62b943247BA80934FBAbee916Ae4C8");
        assert!(connector.connect(&id).await.is_ok());
    }
}
