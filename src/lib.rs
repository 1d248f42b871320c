#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Reqwest middleware for [CAIP-122](https://chainagnostic.org/CAIPs/caip-122)
//! "Sign-In-With-X" request authentication.
//!
//! This crate provides a [`SiwxClient`] that can be used as a `reqwest`
//! middleware to authenticate every outgoing request with a wallet-controlled
//! identity. Per request it builds a CAIP-122 identity assertion, obtains a
//! signature from a chain-family signer, and attaches the
//! `base64(JSON({message, signature}))` envelope as the `SIGN-IN-WITH-X`
//! header. Payment handling for `402 Payment Required` responses is not part
//! of this crate: compose an x402 middleware (e.g. `x402-reqwest`) after the
//! sign-in layer and the 402-driven retry carries the same identity header.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use siwx_reqwest::{ChainId, ReqwestWithSiwx, ReqwestWithSiwxBuild, SiwxClient};
//! use siwx_reqwest::chains::evm::EvmSiwxSigner;
//! use alloy_signer_local::PrivateKeySigner;
//! use reqwest::Client;
//! use x402_reqwest::X402Client;
//!
//! // One key authenticates requests and pays for them
//! let key: PrivateKeySigner = "PRIVATE_KEY".parse()?;
//! let signer = EvmSiwxSigner::new(key.clone(), ChainId::new("eip155", "8453"));
//!
//! // Sign-in middleware first, payment middleware after it
//! let http = Client::new()
//!     .with_siwx(SiwxClient::new(signer))
//!     .builder()
//!     .with(X402Client::new().register(scheme_client))
//!     .build();
//!
//! // Use the client - every request carries a SIGN-IN-WITH-X header
//! let response = http
//!     .get("https://api.example.com/api/v1/session/balance")
//!     .send()
//!     .await?;
//! ```
//!
//! ## Signer Adapters
//!
//! Chain-family differences stay behind the [`chains::SiwxSigner`] boundary:
//!
//! - **[`chains::evm::EvmSiwxSigner`]** - account-based chains, EIP-191
//!   personal-message signing, hex signatures
//! - **[`chains::solana::SolanaSiwxSigner`]** - ledger-based chains, detached
//!   ed25519 signing, base58 signatures
//!
//! ## Session Cache
//!
//! Configure a [`SessionCache`] via [`SiwxClient::with_session_cache`] to
//! reuse an unexpired signed assertion instead of prompting the signer per
//! request. The cache is keyed by signer address, see the module docs of
//! [`session`] for the scoping consequences.
//!
//! ## Typed API Client
//!
//! [`ApiClient`] layers the remote API's chat-completion and session-balance
//! endpoints over an injected, already-authenticated transport.

mod builder;
mod chain_id;
mod client;
mod envelope;
mod error;
mod message;

pub mod api;
pub mod chains;
pub mod session;

pub use api::{ApiClient, ApiClientError, SessionBalance};
pub use builder::*;
pub use chain_id::{ChainId, ChainIdFormatError};
pub use client::SiwxClient;
pub use envelope::{SIGN_IN_WITH_X_HEADER, SignedEnvelope};
pub use error::SiwxError;
pub use message::{SIWX_VERSION, SiwxPayload};
pub use session::{MemorySessionCache, SessionCache};
