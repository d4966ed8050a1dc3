//! Chain signature contract references
//!
//! A contract is the NEAR account hosting the MPC signer. Construction checks
//! NEAR account-id syntax so a malformed reference never reaches a caller.

use crate::error::{ChainSignaturesError, ChainSignaturesResult};
use crate::network::NearNetworkId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIN_ACCOUNT_LEN: usize = 2;
const MAX_ACCOUNT_LEN: usize = 64;

/// NEAR account id of a chain signature contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainSignatureContract(String);

impl ChainSignatureContract {
    pub const MAINNET_SIGNER: &'static str = "v1.signer";
    pub const TESTNET_SIGNER: &'static str = "v1.signer-prod.testnet";

    /// Build a contract reference from a NEAR account id.
    ///
    /// Surrounding whitespace is trimmed before the syntax check, whatever
    /// the source (environment, file or code).
    ///
    /// # Errors
    ///
    /// Returns [`ChainSignaturesError::InvalidContract`] when the trimmed
    /// account id is not valid NEAR account-id syntax.
    pub fn new(account: impl Into<String>) -> ChainSignaturesResult<Self> {
        let account = account.into();
        let trimmed = account.trim();
        validate_account_id(trimmed)?;

        if trimmed.len() == account.len() {
            Ok(Self(account))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn for_network(network: NearNetworkId) -> Self {
        match network {
            NearNetworkId::Mainnet => Self(Self::MAINNET_SIGNER.to_string()),
            NearNetworkId::Testnet => Self(Self::TESTNET_SIGNER.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Network implied by the account's top-level name, if any.
    ///
    /// Custom deployments under other top-level accounts return `None`.
    #[must_use]
    pub fn implied_network(&self) -> Option<NearNetworkId> {
        if self.0 == Self::MAINNET_SIGNER || self.0.ends_with(".near") {
            Some(NearNetworkId::Mainnet)
        } else if self.0 == "testnet" || self.0.ends_with(".testnet") {
            Some(NearNetworkId::Testnet)
        } else {
            None
        }
    }
}

fn validate_account_id(account: &str) -> ChainSignaturesResult<()> {
    let invalid = |reason: String| ChainSignaturesError::InvalidContract {
        account: account.to_string(),
        reason,
    };

    if account.len() < MIN_ACCOUNT_LEN {
        return Err(invalid(format!("shorter than {MIN_ACCOUNT_LEN} chars")));
    }
    if account.len() > MAX_ACCOUNT_LEN {
        return Err(invalid(format!("longer than {MAX_ACCOUNT_LEN} chars")));
    }

    let mut last_was_separator = true;
    for c in account.chars() {
        match c {
            'a'..='z' | '0'..='9' => last_was_separator = false,
            '-' | '_' | '.' if last_was_separator => {
                return Err(invalid(format!("misplaced separator '{c}'")));
            }
            '-' | '_' | '.' => last_was_separator = true,
            _ => return Err(invalid(format!("unexpected character '{c}'"))),
        }
    }
    if last_was_separator {
        return Err(invalid("ends with a separator".to_string()));
    }

    Ok(())
}

impl FromStr for ChainSignatureContract {
    type Err = ChainSignaturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ChainSignatureContract {
    type Error = ChainSignaturesError;

    fn try_from(value: String) -> ChainSignaturesResult<Self> {
        Self::new(value)
    }
}

impl From<ChainSignatureContract> for String {
    fn from(contract: ChainSignatureContract) -> Self {
        contract.0
    }
}

impl AsRef<str> for ChainSignatureContract {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainSignatureContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
