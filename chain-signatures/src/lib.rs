//! Data contracts shared with NEAR multichain signing tooling
//!
//! This crate defines the values exchanged with an external chain signature
//! library:
//! - [`DerivedAddresses`]: optional Bitcoin and EVM addresses derived for an account
//! - [`ChainSignaturesConfig`]: the NEAR network paired with its signer contract
//!
//! Derivation and signing stay with the external library. What lives here is
//! the typed shape of those values, their wire format, and configuration
//! loading from files and the environment.
//!
//! # Example
//!
//! ```rust
//! use chain_signatures::{ChainSignaturesConfig, DerivedAddresses, NearNetworkId};
//!
//! let config = ChainSignaturesConfig::for_network(NearNetworkId::Testnet);
//! assert_eq!(config.contract.as_str(), "v1.signer-prod.testnet");
//!
//! let addresses = DerivedAddresses::new().with_evm("0x4d3b1b0c5a1a3c9e0f2b7a6d8e9c1f2a3b4c5d6e");
//! assert!(addresses.btc.is_none());
//! ```

pub mod addresses;
pub mod config;
pub mod contract;
pub mod error;
pub mod network;

pub use addresses::{AddressKind, DerivedAddresses};
pub use self::config::ChainSignaturesConfig;
pub use contract::ChainSignatureContract;
pub use error::*;
pub use network::NearNetworkId;
