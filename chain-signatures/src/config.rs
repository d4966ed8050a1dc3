//! Chain signature configuration
//!
//! Pairs the NEAR network with the signer contract deployed on it. Sources:
//! - Environment variables (`CHAIN_SIGNATURES_*`)
//! - YAML, TOML or JSON files through the `config` crate
//! - Environment overrides layered on top of a file

use crate::contract::ChainSignatureContract;
use crate::error::{ChainSignaturesError, ChainSignaturesResult};
use crate::network::NearNetworkId;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_NEAR_NETWORK_ID: &str = "CHAIN_SIGNATURES_NEAR_NETWORK_ID";
pub const ENV_CONTRACT: &str = "CHAIN_SIGNATURES_CONTRACT";

/// Network and signer contract used for chain signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSignaturesConfig {
    #[serde(
        rename = "nearNetworkId",
        alias = "near_network_id",
        alias = "nearnetworkid"
    )]
    pub near_network_id: NearNetworkId,

    pub contract: ChainSignatureContract,
}

impl ChainSignaturesConfig {
    #[must_use]
    pub fn new(near_network_id: NearNetworkId, contract: ChainSignatureContract) -> Self {
        Self {
            near_network_id,
            contract,
        }
    }

    /// Pair a network with its canonical signer contract
    #[must_use]
    pub fn for_network(near_network_id: NearNetworkId) -> Self {
        Self::new(near_network_id, near_network_id.default_contract())
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// See [`ChainSignaturesConfig::from_lookup`].
    pub fn from_env() -> ChainSignaturesResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key lookup.
    ///
    /// The network is required; the contract falls back to the network's
    /// canonical signer when unset or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Configuration`] when the network is
    /// missing, and a parse error when either value is malformed.
    pub fn from_lookup<F>(lookup: F) -> ChainSignaturesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let near_network_id: NearNetworkId = non_blank(lookup(ENV_NEAR_NETWORK_ID))
            .ok_or_else(|| {
                ChainSignaturesError::Configuration(format!("{} is required", ENV_NEAR_NETWORK_ID))
            })?
            .parse()?;

        let contract = match non_blank(lookup(ENV_CONTRACT)) {
            Some(account) => account.parse()?,
            None => near_network_id.default_contract(),
        };

        Ok(Self::new(near_network_id, contract))
    }

    /// Load configuration from a YAML, TOML or JSON file
    ///
    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Source`] when the file is missing,
    /// malformed, or lacks either field.
    pub fn from_file(path: impl AsRef<Path>) -> ChainSignaturesResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading chain signatures configuration file");

        let config = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?
            .try_deserialize::<Self>()?;

        Ok(config)
    }

    /// Resolve configuration from an optional file, then environment overrides
    ///
    /// # Errors
    ///
    /// See [`ChainSignaturesConfig::load_with`].
    pub fn load(path: Option<&Path>) -> ChainSignaturesResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from an optional file, then `lookup` overrides.
    ///
    /// # Errors
    ///
    /// Fails as [`ChainSignaturesConfig::from_file`] does when a file is
    /// given, otherwise as [`ChainSignaturesConfig::from_lookup`] does.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> ChainSignaturesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(path) => Self::from_file(path)?.apply_env_overrides(&lookup)?,
            None => Self::from_lookup(&lookup)?,
        };

        if let Some(implied) = config.network_mismatch() {
            tracing::warn!(
                network = %config.near_network_id,
                contract = %config.contract,
                implied_network = %implied,
                "Chain signature contract appears to belong to a different network"
            );
        }

        tracing::info!(
            network = %config.near_network_id,
            contract = %config.contract,
            "Resolved chain signatures configuration"
        );

        Ok(config)
    }

    /// Override fields with any `CHAIN_SIGNATURES_*` values present in `lookup`
    ///
    /// # Errors
    ///
    /// Returns a parse error when an override value is malformed.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> ChainSignaturesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = non_blank(lookup(ENV_NEAR_NETWORK_ID)) {
            self.near_network_id = network.parse()?;
        }

        if let Some(account) = non_blank(lookup(ENV_CONTRACT)) {
            self.contract = account.parse()?;
        }

        Ok(self)
    }

    /// Network implied by the contract when it differs from `near_network_id`
    #[must_use]
    pub fn network_mismatch(&self) -> Option<NearNetworkId> {
        self.contract
            .implied_network()
            .filter(|implied| *implied != self.near_network_id)
    }

    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Serialization`] for malformed JSON or
    /// a missing field.
    pub fn from_json(json: &str) -> ChainSignaturesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> ChainSignaturesResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
