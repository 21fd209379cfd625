use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("wallet provider setup failed: {0}")]
    Provider(String),
}
