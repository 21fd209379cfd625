//! Wallet-side identity resolution.
//!
//! The wallet provider is the only party that knows which address the
//! session acts for. Resolution may prompt the wallet holder, who is free to
//! decline. [`IdentityResolver`] is the seam; [`RpcWalletProvider`] talks to
//! an EIP-1193 style provider exposed over JSON-RPC.

pub mod error;
pub mod provider;
pub mod resolver;

pub use error::IdentityError;
pub use provider::RpcWalletProvider;
pub use resolver::IdentityResolver;
