use ballot_rpc::RpcError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger transport error: {0}")]
    Transport(String),

    #[error("transaction signature rejected by the wallet holder")]
    UserRejected,

    #[error("transaction {hash} reverted")]
    Reverted { hash: String },

    #[error("transaction {hash} was dropped before inclusion")]
    Dropped { hash: String },

    #[error("timed out waiting for confirmation")]
    Timeout,

    #[error("failed to encode contract call: {0}")]
    Encode(String),

    #[error("failed to decode ledger response: {0}")]
    Decode(String),

    #[error("invalid identity for ledger addressing: {0}")]
    InvalidIdentity(String),
}

impl From<RpcError> for LedgerError {
    fn from(e: RpcError) -> Self {
        if e.is_user_rejection() {
            LedgerError::UserRejected
        } else {
            LedgerError::Transport(e.to_string())
        }
    }
}
