//! CAIP-122 sign-in payload and message canonicalization.
//!
//! A [`SiwxPayload`] carries the structured fields of a
//! [CAIP-122](https://chainagnostic.org/CAIPs/caip-122) "Sign-In-With-X"
//! identity assertion. [`SiwxPayload::to_message`] renders it into the
//! canonical plaintext block a wallet signs. The line layout and label strings
//! are a wire-format contract: a remote verifier reconstructs the same text
//! from the same fields, so any byte-level deviation breaks signature
//! verification.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::chain_id::ChainId;

/// CAIP-122 assertion format version. The only version defined today.
pub const SIWX_VERSION: &str = "1";

/// A structured CAIP-122 identity assertion.
///
/// Optional fields that are `None` (or an empty `resources` list) are omitted
/// from the canonical message entirely, never rendered as empty placeholders.
/// `expiration_time` is required: an assertion without one is malformed and
/// cannot be represented.
///
/// The `signature` field is ignored by canonicalization; it is populated once
/// the payload has been signed, and travels with the payload only so a session
/// cache can store the signed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiwxPayload {
    /// Host name of the relying party that requested the assertion.
    pub domain: String,
    /// The wallet's chain-native address string.
    pub address: String,
    /// Free-text statement shown to the signer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    /// The resource URI the assertion is scoped to.
    pub uri: String,
    /// Assertion format version, the literal `"1"`.
    pub version: String,
    /// CAIP-2 chain identifier of the signing network.
    pub chain_id: ChainId,
    /// Anti-replay token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// When the assertion was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// The assertion must not be considered valid after this time.
    pub expiration_time: DateTime<Utc>,
    /// The assertion is invalid before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    /// Opaque string correlating to a server-issued request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Ordered URIs scoping what the assertion authorizes. Empty means absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    /// The signature over the canonical message, present once signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Renders a timestamp the way CAIP-122 messages carry them:
/// ISO-8601 with millisecond precision and a `Z` suffix.
fn iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SiwxPayload {
    /// Renders the canonical CAIP-122 message text for this payload.
    ///
    /// Deterministic and total: two calls on the same payload produce identical
    /// bytes, independent of the `signature` field. Lines are joined with `\n`
    /// and there is no trailing newline.
    ///
    /// # Example
    ///
    /// ```
    /// use siwx_reqwest::{ChainId, SiwxPayload};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let payload = SiwxPayload {
    ///     domain: "example.com".to_string(),
    ///     address: "0xABC".to_string(),
    ///     statement: None,
    ///     uri: "https://example.com/r".to_string(),
    ///     version: "1".to_string(),
    ///     chain_id: ChainId::new("eip155", "1"),
    ///     nonce: None,
    ///     issued_at: None,
    ///     expiration_time: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    ///     not_before: None,
    ///     request_id: None,
    ///     resources: vec![],
    ///     signature: None,
    /// };
    /// assert!(payload.to_message().starts_with(
    ///     "example.com wants you to sign in with your Ethereum account:\n0xABC\n"
    /// ));
    /// ```
    pub fn to_message(&self) -> String {
        let chain_name = self.chain_id.sign_in_chain_name();
        let mut lines = vec![
            format!(
                "{} wants you to sign in with your {} account:",
                self.domain, chain_name
            ),
            self.address.clone(),
            String::new(),
        ];
        if let Some(statement) = &self.statement {
            lines.push(statement.clone());
            lines.push(String::new());
        }
        lines.push(format!("URI: {}", self.uri));
        lines.push(format!("Version: {}", self.version));
        lines.push(format!("Chain ID: {}", self.chain_id));
        if let Some(nonce) = &self.nonce {
            lines.push(format!("Nonce: {nonce}"));
        }
        if let Some(issued_at) = &self.issued_at {
            lines.push(format!("Issued At: {}", iso8601(issued_at)));
        }
        lines.push(format!("Expiration Time: {}", iso8601(&self.expiration_time)));
        if let Some(not_before) = &self.not_before {
            lines.push(format!("Not Before: {}", iso8601(not_before)));
        }
        if let Some(request_id) = &self.request_id {
            lines.push(format!("Request ID: {request_id}"));
        }
        if !self.resources.is_empty() {
            lines.push("Resources:".to_string());
            for resource in &self.resources {
                lines.push(format!("- {resource}"));
            }
        }
        lines.join("\n")
    }

    /// True while `expiration_time` is strictly in the future.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn minimal_payload() -> SiwxPayload {
        SiwxPayload {
            domain: "example.com".to_string(),
            address: "0xABC".to_string(),
            statement: None,
            uri: "https://example.com/r".to_string(),
            version: SIWX_VERSION.to_string(),
            chain_id: ChainId::new("eip155", "1"),
            nonce: None,
            issued_at: None,
            expiration_time: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            not_before: None,
            request_id: None,
            resources: vec![],
            signature: None,
        }
    }

    #[test]
    fn test_minimal_message_exact_layout() {
        let expected = "\
example.com wants you to sign in with your Ethereum account:
0xABC

URI: https://example.com/r
Version: 1
Chain ID: eip155:1
Expiration Time: 2030-01-01T00:00:00.000Z";
        assert_eq!(minimal_payload().to_message(), expected);
    }

    #[test]
    fn test_message_is_deterministic_and_ignores_signature() {
        let unsigned = minimal_payload();
        let mut signed = unsigned.clone();
        signed.signature = Some("0xdeadbeef".to_string());

        assert_eq!(unsigned.to_message(), unsigned.to_message());
        assert_eq!(unsigned.to_message(), signed.to_message());
    }

    #[test]
    fn test_all_optional_fields_in_order() {
        let mut payload = minimal_payload();
        payload.statement = Some("Sign in to the API".to_string());
        payload.nonce = Some("abc123".to_string());
        payload.issued_at = Some(Utc.with_ymd_and_hms(2029, 12, 31, 23, 0, 0).unwrap());
        payload.not_before = Some(Utc.with_ymd_and_hms(2029, 12, 31, 23, 30, 0).unwrap());
        payload.request_id = Some("req-7".to_string());
        payload.resources = vec!["r1".to_string(), "r2".to_string()];

        let expected = "\
example.com wants you to sign in with your Ethereum account:
0xABC

Sign in to the API

URI: https://example.com/r
Version: 1
Chain ID: eip155:1
Nonce: abc123
Issued At: 2029-12-31T23:00:00.000Z
Expiration Time: 2030-01-01T00:00:00.000Z
Not Before: 2029-12-31T23:30:00.000Z
Request ID: req-7
Resources:
- r1
- r2";
        assert_eq!(payload.to_message(), expected);
    }

    #[test]
    fn test_solana_chain_name() {
        let mut payload = minimal_payload();
        payload.chain_id = ChainId::new("solana", "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp");
        payload.address = "9aE476sH92Vz7DMPyq5WLPkrKWivxeuTKEFKd2sZZcde".to_string();
        assert!(payload.to_message().starts_with(
            "example.com wants you to sign in with your Solana account:"
        ));
    }

    #[test]
    fn test_capitalized_namespace_chain_name() {
        let mut payload = minimal_payload();
        payload.chain_id = ChainId::new("cosmos", "foo");
        assert!(payload.to_message().starts_with(
            "example.com wants you to sign in with your Cosmos account:"
        ));
    }

    #[test]
    fn test_absent_optionals_leave_no_placeholder_lines() {
        let message = minimal_payload().to_message();
        assert!(!message.contains("Nonce:"));
        assert!(!message.contains("Issued At:"));
        assert!(!message.contains("Not Before:"));
        assert!(!message.contains("Request ID:"));
        assert!(!message.contains("Resources:"));
        assert!(!message.ends_with('\n'));
    }

    #[test]
    fn test_empty_resources_omits_block() {
        let mut payload = minimal_payload();
        payload.resources = vec![];
        assert!(!payload.to_message().contains("Resources:"));
    }

    #[test]
    fn test_is_fresh_is_strict() {
        let payload = minimal_payload();
        let expiry = payload.expiration_time;
        assert!(payload.is_fresh(expiry - chrono::Duration::seconds(1)));
        assert!(!payload.is_fresh(expiry));
        assert!(!payload.is_fresh(expiry + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_serde_camel_case_wire_shape() {
        let mut payload = minimal_payload();
        payload.nonce = Some("n".to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chainId"], "eip155:1");
        assert_eq!(json["domain"], "example.com");
        assert!(json.get("expirationTime").is_some());
        assert!(json.get("statement").is_none());
        assert!(json.get("signature").is_none());

        let back: SiwxPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
