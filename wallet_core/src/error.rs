use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("no wallet provider available")]
    NoWalletProvider,

    #[error("wallet holder declined the account request")]
    UserRejected,

    #[error("wallet provider error: {0}")]
    Provider(String),
}
