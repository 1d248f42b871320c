//! CAIP-2 chain identifier types.
//!
//! A [CAIP-2](https://standards.chainagnostic.org/CAIPs/caip-2) chain ID names a
//! blockchain network in a chain-agnostic way. It consists of two parts
//! separated by a colon:
//!
//! - **Namespace**: the blockchain ecosystem (e.g., `eip155` for EVM, `solana` for Solana)
//! - **Reference**: the chain-specific identifier (e.g., `1` for Ethereum mainnet,
//!   a genesis-hash prefix for Solana clusters)
//!
//! CAIP-122 sign-in messages embed the chain ID verbatim on the `Chain ID:` line
//! and derive the human-readable account family name on the first line from the
//! namespace, see [`ChainId::sign_in_chain_name`].

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// A CAIP-2 compliant blockchain identifier, `namespace:reference`.
///
/// # Serialization
///
/// Serializes to/from a colon-separated string: `"eip155:8453"`.
///
/// # Example
///
/// ```
/// use siwx_reqwest::ChainId;
///
/// let base = ChainId::new("eip155", "8453");
/// assert_eq!(base.to_string(), "eip155:8453");
///
/// let solana: ChainId = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp".parse().unwrap();
/// assert_eq!(solana.namespace(), "solana");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId {
    /// The blockchain namespace (e.g., `eip155`, `solana`).
    pub namespace: String,
    /// The chain-specific reference (e.g., `1`, `8453`, a genesis hash).
    pub reference: String,
}

impl ChainId {
    /// Creates a new chain ID from namespace and reference components.
    pub fn new<N: Into<String>, R: Into<String>>(namespace: N, reference: R) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Returns the namespace component of the chain ID.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the reference component of the chain ID.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the human-readable chain family name used on the first line of a
    /// CAIP-122 sign-in message.
    ///
    /// `eip155` maps to `Ethereum` and `solana` to `Solana`; any other namespace
    /// is rendered with its first ASCII letter uppercased.
    ///
    /// # Example
    ///
    /// ```
    /// use siwx_reqwest::ChainId;
    ///
    /// assert_eq!(ChainId::new("eip155", "1").sign_in_chain_name(), "Ethereum");
    /// assert_eq!(ChainId::new("cosmos", "cosmoshub-4").sign_in_chain_name(), "Cosmos");
    /// ```
    pub fn sign_in_chain_name(&self) -> String {
        match self.namespace.as_str() {
            "eip155" => "Ethereum".to_string(),
            "solana" => "Solana".to_string(),
            ns => {
                let mut chars = ns.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.to_string()
    }
}

/// Error returned when parsing an invalid chain ID string.
///
/// A valid chain ID must be in the format `namespace:reference` where both
/// components are non-empty strings.
#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id format {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) = s.split_once(':').ok_or(ChainIdFormatError(s.into()))?;
        if namespace.is_empty() || reference.is_empty() {
            return Err(ChainIdFormatError(s.into()));
        }
        Ok(ChainId {
            namespace: namespace.into(),
            reference: reference.into(),
        })
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ChainId::from_str(&s).map_err(de::Error::custom)
    }
}
