//! Chain-family signer adapters.
//!
//! [`SiwxSigner`] is the uniform capability the request authenticator holds:
//! report an address and a network, sign a CAIP-122 payload, and pass payment
//! payload construction through to an external x402 scheme. Two concrete
//! families implement it: account-based chains with personal-message signing
//! ([`evm`]) and ledger-based chains with detached byte-array signing
//! ([`solana`]). Chain-family differences never leak past this boundary.

use std::sync::Arc;

use crate::chain_id::ChainId;
use crate::error::SiwxError;
use crate::message::SiwxPayload;

pub mod evm;
pub mod solana;

/// Uniform signing capability over chain families.
#[async_trait::async_trait]
pub trait SiwxSigner: Send + Sync {
    /// The signer's chain-native address string (e.g. a checksummed `0x…`
    /// address, or a base58 public key).
    fn address(&self) -> String;

    /// The CAIP-2 network the signer operates on, fixed at construction.
    fn network(&self) -> &ChainId;

    /// Canonicalizes the payload and signs its UTF-8 bytes, returning the
    /// chain family's canonical signature string encoding.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying signing primitive propagates as
    /// [`SiwxError::SigningFailed`]; this layer never retries.
    async fn sign_payload(&self, payload: &SiwxPayload) -> Result<String, SiwxError>;

    /// Builds an x402 payment payload for the given requirements.
    ///
    /// Pure pass-through to the configured [`PaymentScheme`]; carries no
    /// logic of its own.
    ///
    /// # Errors
    ///
    /// [`SiwxError::NoPaymentScheme`] when the signer was built without one.
    async fn create_payment_payload(
        &self,
        x402_version: u8,
        requirements: &serde_json::Value,
    ) -> Result<serde_json::Value, SiwxError>;
}

/// Conversion into a shared [`SiwxSigner`] trait object.
pub trait IntoSiwxSigner {
    /// Wraps the signer into an `Arc<dyn SiwxSigner>`.
    fn into_siwx_signer(self) -> Arc<dyn SiwxSigner>;
}

impl IntoSiwxSigner for Arc<dyn SiwxSigner> {
    fn into_siwx_signer(self) -> Arc<dyn SiwxSigner> {
        self
    }
}

/// External x402 payment-protocol scheme.
///
/// Implemented outside this crate (e.g. as glue over an `x402-reqwest` scheme
/// client); the signer adapters only forward to it.
#[async_trait::async_trait]
pub trait PaymentScheme: Send + Sync {
    /// Produces a signed payment payload satisfying `requirements` under the
    /// given x402 protocol version.
    async fn create_payment_payload(
        &self,
        x402_version: u8,
        requirements: &serde_json::Value,
    ) -> Result<serde_json::Value, SiwxError>;
}
