//! Signed envelope codec for the `SIGN-IN-WITH-X` header.
//!
//! A [`SignedEnvelope`] pairs a canonical CAIP-122 message with the signature
//! computed over its UTF-8 bytes, and travels as a single base64 token:
//! `base64(JSON({message, signature}))`, standard alphabet. Decoding is the
//! exact inverse. No validation beyond syntax happens here; expiration and
//! signature checks belong to the remote verifier.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use serde::{Deserialize, Serialize};

use crate::error::SiwxError;

/// Name of the HTTP request header carrying the encoded envelope.
pub const SIGN_IN_WITH_X_HEADER: &str = "SIGN-IN-WITH-X";

/// A canonical message together with its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// The canonical CAIP-122 message text that was signed.
    pub message: String,
    /// The chain-native signature string over the message's UTF-8 bytes.
    pub signature: String,
}

impl SignedEnvelope {
    /// Creates an envelope from a message and its signature.
    pub fn new<M: Into<String>, S: Into<String>>(message: M, signature: S) -> Self {
        Self {
            message: message.into(),
            signature: signature.into(),
        }
    }

    /// Encodes the envelope as a base64 header token.
    ///
    /// # Example
    ///
    /// ```
    /// use siwx_reqwest::SignedEnvelope;
    ///
    /// let token = SignedEnvelope::new("m", "s").encode();
    /// assert_eq!(token, "eyJtZXNzYWdlIjoibSIsInNpZ25hdHVyZSI6InMifQ==");
    /// ```
    pub fn encode(&self) -> String {
        // Serializing two plain strings cannot fail.
        let json = serde_json::to_vec(self).expect("envelope JSON serialization");
        b64.encode(json)
    }

    /// Decodes a base64 header token back into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SiwxError::MalformedEnvelope`] when the token is not valid
    /// base64 or its payload is not the expected JSON shape.
    pub fn decode(token: &str) -> Result<Self, SiwxError> {
        let bytes = b64
            .decode(token)
            .map_err(|e| SiwxError::MalformedEnvelope(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SiwxError::MalformedEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_token() {
        let envelope = SignedEnvelope::new("M", "S");
        assert_eq!(envelope.encode(), "eyJtZXNzYWdlIjoiTSIsInNpZ25hdHVyZSI6IlMifQ==");
    }

    #[test]
    fn test_round_trip() {
        let envelope = SignedEnvelope::new(
            "example.com wants you to sign in with your Ethereum account:\n0xABC",
            "0xfeed",
        );
        let decoded = SignedEnvelope::decode(&envelope.encode()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_round_trip_preserves_multiline_and_unicode() {
        let envelope = SignedEnvelope::new("line1\nline2\n\n∆ statement", "sig");
        let decoded = SignedEnvelope::decode(&envelope.encode()).unwrap();
        assert_eq!(decoded.message, "line1\nline2\n\n∆ statement");
        assert_eq!(decoded.signature, "sig");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let err = SignedEnvelope::decode("not base64 !!!").unwrap_err();
        assert!(matches!(err, SiwxError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let token = b64.encode(b"plain text, not json");
        let err = SignedEnvelope::decode(&token).unwrap_err();
        assert!(matches!(err, SiwxError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_decode_rejects_wrong_json_shape() {
        let token = b64.encode(br#"{"message": "m"}"#);
        let err = SignedEnvelope::decode(&token).unwrap_err();
        assert!(matches!(err, SiwxError::MalformedEnvelope(_)));
    }
}
