//! Request authentication middleware.
//!
//! [`SiwxClient`] is a `reqwest` middleware that attaches a signed CAIP-122
//! identity assertion to every outgoing request as the `SIGN-IN-WITH-X`
//! header, then hands the request to the rest of the middleware chain. An
//! x402 payment middleware composed after it sees the header already in
//! place, so a 402-driven retry carries the same assertion.

use chrono::Utc;
use http::{Extensions, HeaderMap};
use rand::{Rng, rng};
use reqwest::{Request, Response};
use reqwest_middleware as rqm;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::chains::{IntoSiwxSigner, SiwxSigner};
use crate::envelope::{SIGN_IN_WITH_X_HEADER, SignedEnvelope};
use crate::error::SiwxError;
use crate::message::{SIWX_VERSION, SiwxPayload};
use crate::session::SessionCache;

#[cfg(feature = "telemetry")]
use tracing::{debug, instrument, trace};

/// Middleware that signs requests with a CAIP-122 identity assertion.
///
/// ## Creating a SiwxClient
///
/// ```rust,no_run
/// use siwx_reqwest::{ChainId, SiwxClient};
/// use siwx_reqwest::chains::evm::EvmSiwxSigner;
/// use alloy_signer_local::PrivateKeySigner;
///
/// let signer = EvmSiwxSigner::new(PrivateKeySigner::random(), ChainId::new("eip155", "8453"));
/// let siwx = SiwxClient::new(signer);
/// ```
///
/// ## Options
///
/// - [`SiwxClient::with_domain`] signs requests as if addressed to a fixed
///   domain, rewriting the `uri` field accordingly. Lets a request to a
///   local or staging deployment verify against the production domain the
///   server expects.
/// - [`SiwxClient::with_session_cache`] reuses an unexpired signed assertion
///   instead of prompting the signer per request.
/// - [`SiwxClient::with_validity_window`] controls how far in the future
///   `expirationTime` is set (default one hour).
///
/// ## Using with Reqwest
///
/// See the [`ReqwestWithSiwx`](crate::ReqwestWithSiwx) trait for integrating
/// with reqwest.
pub struct SiwxClient {
    signer: Arc<dyn SiwxSigner>,
    siwx_domain: Option<String>,
    validity_window: Duration,
    statement: Option<String>,
    session_cache: Option<Arc<dyn SessionCache>>,
}

impl SiwxClient {
    /// Default validity window for fresh assertions (one hour).
    pub const DEFAULT_VALIDITY_WINDOW: Duration = Duration::from_secs(60 * 60);

    /// Creates a new [`SiwxClient`] around a signer.
    pub fn new(signer: impl IntoSiwxSigner) -> Self {
        Self {
            signer: signer.into_siwx_signer(),
            siwx_domain: None,
            validity_window: Self::DEFAULT_VALIDITY_WINDOW,
            statement: None,
            session_cache: None,
        }
    }

    /// Signs every request as if addressed to `domain` instead of the
    /// request URL's host.
    pub fn with_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.siwx_domain = Some(domain.into());
        self
    }

    /// Sets how far in the future `expirationTime` is placed on fresh
    /// assertions.
    pub fn with_validity_window(mut self, window: Duration) -> Self {
        self.validity_window = window;
        self
    }

    /// Adds a free-text statement to every assertion.
    pub fn with_statement<S: Into<String>>(mut self, statement: S) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Configures a session cache so unexpired signed assertions are reused
    /// across requests from the same signer address.
    pub fn with_session_cache(mut self, cache: Arc<dyn SessionCache>) -> Self {
        self.session_cache = Some(cache);
        self
    }

    /// Resolves the sign-in domain and the `uri` field for a request URL.
    ///
    /// With a domain override the URL is rewritten to that host, keeping
    /// scheme, path, and query; otherwise the URL is used verbatim and its
    /// host becomes the domain.
    fn resolve_sign_in_target(&self, url: &Url) -> Result<(String, Url), SiwxError> {
        match &self.siwx_domain {
            Some(domain) => {
                let mut uri = url.clone();
                uri.set_host(Some(domain))
                    .map_err(|source| SiwxError::InvalidDomain {
                        domain: domain.clone(),
                        source,
                    })?;
                Ok((domain.clone(), uri))
            }
            None => {
                let host = url.host_str().ok_or(SiwxError::MissingDomain)?;
                Ok((host.to_string(), url.clone()))
            }
        }
    }

    /// Builds an unsigned assertion for one request.
    fn fresh_payload(&self, domain: String, uri: &Url) -> SiwxPayload {
        let issued_at = Utc::now();
        let nonce: [u8; 16] = rng().random();
        SiwxPayload {
            domain,
            address: self.signer.address(),
            statement: self.statement.clone(),
            uri: uri.to_string(),
            version: SIWX_VERSION.to_string(),
            chain_id: self.signer.network().clone(),
            nonce: Some(hex::encode(nonce)),
            issued_at: Some(issued_at),
            expiration_time: issued_at + self.validity_window,
            not_before: None,
            request_id: None,
            resources: vec![],
            signature: None,
        }
    }

    /// Produces the signed envelope for a request URL, consulting the session
    /// cache first when one is configured.
    ///
    /// The cache is keyed by signer address alone: an unexpired cached
    /// assertion is reused even when the request URI differs from the one it
    /// was signed for.
    #[cfg_attr(feature = "telemetry", instrument(name = "siwx.identity_envelope", skip_all, err))]
    pub async fn identity_envelope(&self, url: &Url) -> Result<SignedEnvelope, SiwxError> {
        let (domain, uri) = self.resolve_sign_in_target(url)?;
        let address = self.signer.address();

        if let Some(cache) = &self.session_cache {
            if let Some(stored) = cache.get(&address).await {
                if stored.is_fresh(Utc::now()) {
                    if let Some(signature) = &stored.signature {
                        #[cfg(feature = "telemetry")]
                        trace!(%address, "Reusing cached signed assertion");
                        return Ok(SignedEnvelope::new(stored.to_message(), signature.clone()));
                    }
                }
            }
        }

        // The message and signature must come from the same payload instance.
        let mut payload = self.fresh_payload(domain, &uri);
        let signature = self.signer.sign_payload(&payload).await?;
        payload.signature = Some(signature.clone());

        if let Some(cache) = &self.session_cache {
            cache.set(&address, payload.clone()).await;
        }

        #[cfg(feature = "telemetry")]
        debug!(%address, uri = %payload.uri, "Signed fresh assertion");

        Ok(SignedEnvelope::new(payload.to_message(), signature))
    }

    /// Produces the `SIGN-IN-WITH-X` header for a request URL.
    pub async fn make_identity_headers(&self, url: &Url) -> Result<HeaderMap, SiwxError> {
        let envelope = self.identity_envelope(url).await?;
        let headers = {
            let mut headers = HeaderMap::new();
            headers.insert(SIGN_IN_WITH_X_HEADER, envelope.encode().parse().unwrap());
            headers
        };
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl rqm::Middleware for SiwxClient {
    /// Attaches the identity header and delegates to the rest of the chain.
    ///
    /// Caller-supplied headers are preserved; responses and errors from the
    /// inner transport (including 401/402 statuses) pass through untouched.
    #[cfg_attr(feature = "telemetry", instrument(name = "siwx.handle", skip_all, err))]
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        let headers = self
            .make_identity_headers(req.url())
            .await
            .map_err(|e| rqm::Error::Middleware(e.into()))?;
        req.headers_mut().extend(headers);

        next.run(req, extensions).await
    }
}
