//! Account-family signer adapter for EIP-155 chains.
//!
//! Signing uses EIP-191 personal-message prefixing over the canonical message
//! bytes; the resulting 65-byte signature is rendered as `0x`-prefixed hex.

use alloy_primitives::{Address, Signature};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::Arc;

use crate::chain_id::ChainId;
use crate::chains::{IntoSiwxSigner, PaymentScheme, SiwxSigner};
use crate::error::SiwxError;
use crate::message::SiwxPayload;

/// Personal-message (EIP-191) signing capability.
///
/// A narrower seam than `alloy_signer::Signer` so hardware or remote signers
/// can participate without implementing the full trait.
#[async_trait]
pub trait PersonalSigner: Send + Sync {
    /// Returns the address of the signer.
    fn address(&self) -> Address;

    /// Signs the given message bytes with EIP-191 prefixing.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, alloy_signer::Error>;
}

#[async_trait]
impl PersonalSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_message(self, message).await
    }
}

#[async_trait]
impl PersonalSigner for Arc<PrivateKeySigner> {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self.as_ref())
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_message(self.as_ref(), message).await
    }
}

/// [`SiwxSigner`] over an EIP-155 account.
///
/// # Example
///
/// ```
/// use siwx_reqwest::ChainId;
/// use siwx_reqwest::chains::evm::EvmSiwxSigner;
/// use alloy_signer_local::PrivateKeySigner;
///
/// let signer = EvmSiwxSigner::new(PrivateKeySigner::random(), ChainId::new("eip155", "8453"));
/// ```
pub struct EvmSiwxSigner<S> {
    signer: S,
    network: ChainId,
    payment_scheme: Option<Arc<dyn PaymentScheme>>,
}

impl<S> EvmSiwxSigner<S> {
    /// Creates an adapter over a personal-message signer, fixed to `network`.
    pub fn new(signer: S, network: ChainId) -> Self {
        Self {
            signer,
            network,
            payment_scheme: None,
        }
    }

    /// Attaches the external x402 payment scheme this signer delegates
    /// payment payload construction to.
    pub fn with_payment_scheme(mut self, scheme: Arc<dyn PaymentScheme>) -> Self {
        self.payment_scheme = Some(scheme);
        self
    }
}

#[async_trait]
impl<S> SiwxSigner for EvmSiwxSigner<S>
where
    S: PersonalSigner,
{
    fn address(&self) -> String {
        self.signer.address().to_string()
    }

    fn network(&self) -> &ChainId {
        &self.network
    }

    async fn sign_payload(&self, payload: &SiwxPayload) -> Result<String, SiwxError> {
        let message = payload.to_message();
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| SiwxError::SigningFailed(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    async fn create_payment_payload(
        &self,
        x402_version: u8,
        requirements: &serde_json::Value,
    ) -> Result<serde_json::Value, SiwxError> {
        match &self.payment_scheme {
            Some(scheme) => scheme.create_payment_payload(x402_version, requirements).await,
            None => Err(SiwxError::NoPaymentScheme),
        }
    }
}

impl<S> IntoSiwxSigner for EvmSiwxSigner<S>
where
    S: PersonalSigner + 'static,
{
    fn into_siwx_signer(self) -> Arc<dyn SiwxSigner> {
        Arc::new(self)
    }
}
