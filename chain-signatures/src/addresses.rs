//! Derived addresses
//!
//! `DerivedAddresses` carries whatever addresses an external derivation routine
//! produced for a NEAR account. Each chain is independent: a value may hold
//! neither, either, or both addresses.

use crate::error::{ChainSignaturesError, ChainSignaturesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain family an address was derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Bitcoin
    Btc,
    /// EVM-compatible chains
    Evm,
}

impl AddressKind {
    pub const ALL: [AddressKind; 2] = [AddressKind::Btc, AddressKind::Evm];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressKind::Btc => "btc",
            AddressKind::Evm => "evm",
        }
    }
}

impl FromStr for AddressKind {
    type Err = ChainSignaturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(AddressKind::Btc),
            "evm" | "eth" | "ethereum" => Ok(AddressKind::Evm),
            _ => Err(ChainSignaturesError::UnknownAddressKind(s.to_string())),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses derived for a single account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evm: Option<String>,
}

impl DerivedAddresses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_btc(mut self, address: impl Into<String>) -> Self {
        self.btc = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_evm(mut self, address: impl Into<String>) -> Self {
        self.evm = Some(address.into());
        self
    }

    #[must_use]
    pub fn get(&self, kind: AddressKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    /// Store an address, returning the one it replaced
    pub fn set(&mut self, kind: AddressKind, address: impl Into<String>) -> Option<String> {
        self.slot_mut(kind).replace(address.into())
    }

    pub fn take(&mut self, kind: AddressKind) -> Option<String> {
        self.slot_mut(kind).take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.btc.is_none() && self.evm.is_none()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.btc.is_some() && self.evm.is_some()
    }

    /// Populated addresses in `AddressKind::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (AddressKind, &str)> + '_ {
        AddressKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|address| (kind, address)))
    }

    /// Parse a JSON document such as `{"btc": "...", "evm": "..."}`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Serialization`] when the document is not
    /// a JSON object or an address is not a string.
    pub fn from_json(json: &str) -> ChainSignaturesResult<Self> {
        let addresses: Self = serde_json::from_str(json)?;
        tracing::debug!(
            btc = addresses.btc.is_some(),
            evm = addresses.evm.is_some(),
            "Parsed derived addresses"
        );
        Ok(addresses)
    }

    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> ChainSignaturesResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn slot(&self, kind: AddressKind) -> &Option<String> {
        match kind {
            AddressKind::Btc => &self.btc,
            AddressKind::Evm => &self.evm,
        }
    }

    fn slot_mut(&mut self, kind: AddressKind) -> &mut Option<String> {
        match kind {
            AddressKind::Btc => &mut self.btc,
            AddressKind::Evm => &mut self.evm,
        }
    }
}
