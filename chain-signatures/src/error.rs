use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainSignaturesError {
    #[error("Unknown NEAR network: {0}. Valid options: mainnet, testnet")]
    UnknownNetwork(String),

    #[error("Unknown address kind: {0}. Valid options: btc, evm")]
    UnknownAddressKind(String),

    #[error("Invalid chain signature contract '{account}': {reason}")]
    InvalidContract { account: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ChainSignaturesResult<T> = Result<T, ChainSignaturesError>;
