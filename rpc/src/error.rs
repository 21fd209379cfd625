//! RPC error types.

use thiserror::Error;

/// EIP-1193 error code for "the user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Whether the remote side reports that the wallet holder declined.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, RpcError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            RpcError::Unreachable(format!("connection failed: {e}"))
        } else {
            RpcError::RequestFailed(e.to_string())
        }
    }
}
