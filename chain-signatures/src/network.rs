//! NEAR network identifiers

use crate::contract::ChainSignatureContract;
use crate::error::{ChainSignaturesError, ChainSignaturesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NEAR network a chain signature configuration applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NearNetworkId {
    /// NEAR mainnet
    Mainnet,
    /// NEAR testnet
    Testnet,
}

impl NearNetworkId {
    pub const ALL: [NearNetworkId; 2] = [NearNetworkId::Mainnet, NearNetworkId::Testnet];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NearNetworkId::Mainnet => "mainnet",
            NearNetworkId::Testnet => "testnet",
        }
    }

    /// Canonical signer contract deployed on this network
    #[must_use]
    pub fn default_contract(self) -> ChainSignatureContract {
        ChainSignatureContract::for_network(self)
    }
}

impl FromStr for NearNetworkId {
    type Err = ChainSignaturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NearNetworkId::Mainnet),
            "testnet" | "test" => Ok(NearNetworkId::Testnet),
            _ => Err(ChainSignaturesError::UnknownNetwork(s.to_string())),
        }
    }
}

impl TryFrom<String> for NearNetworkId {
    type Error = ChainSignaturesError;

    fn try_from(value: String) -> ChainSignaturesResult<Self> {
        value.parse()
    }
}

impl From<NearNetworkId> for String {
    fn from(network: NearNetworkId) -> Self {
        network.as_str().to_string()
    }
}

impl fmt::Display for NearNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
