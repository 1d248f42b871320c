//! Ledger-family signer adapter for Solana chains.
//!
//! Signing is a detached ed25519 signature over the raw canonical message
//! bytes (no prefixing); the 64-byte signature is rendered as base58.

use async_trait::async_trait;
use solana_keypair::Keypair;
use solana_signer::Signer;
use std::sync::Arc;

use crate::chain_id::ChainId;
use crate::chains::{IntoSiwxSigner, PaymentScheme, SiwxSigner};
use crate::error::SiwxError;
use crate::message::SiwxPayload;

/// [`SiwxSigner`] over a Solana keypair.
pub struct SolanaSiwxSigner {
    keypair: Arc<Keypair>,
    network: ChainId,
    payment_scheme: Option<Arc<dyn PaymentScheme>>,
}

impl SolanaSiwxSigner {
    /// Creates an adapter over a keypair, fixed to `network`.
    pub fn new(keypair: Keypair, network: ChainId) -> Self {
        Self {
            keypair: Arc::new(keypair),
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
impl SiwxSigner for SolanaSiwxSigner {
    fn address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    fn network(&self) -> &ChainId {
        &self.network
    }

    async fn sign_payload(&self, payload: &SiwxPayload) -> Result<String, SiwxError> {
        let message = payload.to_message();
        let signature = self
            .keypair
            .try_sign_message(message.as_bytes())
            .map_err(|e| SiwxError::SigningFailed(e.to_string()))?;
        Ok(bs58::encode(signature).into_string())
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

impl IntoSiwxSigner for SolanaSiwxSigner {
    fn into_siwx_signer(self) -> Arc<dyn SiwxSigner> {
        Arc::new(self)
    }
}
