//! HTTP transport for JSON-RPC calls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;

use crate::error::RpcError;

/// Default timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a single JSON-RPC endpoint.
///
/// Cheap to clone; clones share the connection pool and the request id counter.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

/// The JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

impl RpcClient {
    /// Create a client with default timeout settings.
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeouts(url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with custom request and connect timeouts.
    pub fn with_timeouts(
        url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| RpcError::RequestFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` with positional `params` and decode the `result` field.
    ///
    /// A `null` result decodes into `T` as JSON `null`, so callers expecting
    /// an absent value should ask for an `Option`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(id, method, "rpc request");

        let response = self.http.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))?;

        decode_envelope(method, envelope)
    }
}

fn decode_envelope<T: DeserializeOwned>(method: &str, envelope: Envelope) -> Result<T, RpcError> {
    if let Some(err) = envelope.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let result = envelope.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_result_field() {
        let env = envelope(r#"{"jsonrpc":"2.0","id":1,"result":"0x2a"}"#);
        let value: String = decode_envelope("eth_call", env).unwrap();
        assert_eq!(value, "0x2a");
    }

    #[test]
    fn error_object_becomes_rpc_error() {
        let env = envelope(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        );
        let err = decode_envelope::<String>("eth_requestAccounts", env).unwrap_err();
        assert!(err.is_user_rejection());
    }

    #[test]
    fn null_result_decodes_as_none() {
        let env = envelope(r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
        let value: Option<String> = decode_envelope("eth_getTransactionReceipt", env).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn mistyped_result_is_invalid_response() {
        let env = envelope(r#"{"jsonrpc":"2.0","id":1,"result":42}"#);
        let err = decode_envelope::<Vec<String>>("eth_accounts", env).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn client_creation() {
        let client = RpcClient::new("http://127.0.0.1:8545").unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8545");
    }
}
