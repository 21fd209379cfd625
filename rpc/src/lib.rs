//! JSON-RPC 2.0 client over HTTP.
//!
//! Both the ledger node and the wallet provider speak Ethereum-style
//! JSON-RPC. This crate owns the envelope handling and error mapping so the
//! callers only deal with typed results.

pub mod client;
pub mod error;

pub use client::RpcClient;
pub use error::{RpcError, USER_REJECTED_CODE};
