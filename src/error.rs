//! Error types for the sign-in core.

/// Errors produced while constructing or signing an identity assertion.
///
/// HTTP-level failures are deliberately not represented here: the
/// authenticator passes responses (including 401/402/5xx) through untouched,
/// and the typed API client has its own error type,
/// [`ApiClientError`](crate::api::ApiClientError).
#[derive(Debug, thiserror::Error)]
pub enum SiwxError {
    /// The underlying signer rejected or could not complete the signature.
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    /// An envelope token was not valid base64/JSON on decode.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
    /// The request URL has no host to derive the sign-in domain from.
    #[error("Request URL has no host to derive the sign-in domain from")]
    MissingDomain,
    /// A configured domain override is not a valid URL host.
    #[error("Invalid sign-in domain override {domain}: {source}")]
    InvalidDomain {
        /// The configured override value.
        domain: String,
        #[source]
        source: url::ParseError,
    },
    /// `create_payment_payload` was called on a signer without a configured
    /// payment scheme.
    #[error("No payment scheme configured for this signer")]
    NoPaymentScheme,
}
