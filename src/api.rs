//! Typed client for the authenticated remote API.
//!
//! Thin, stateless-per-call methods over a pre-authenticated transport:
//! a JSON POST for chat completions and a GET for the session balance. No
//! authentication logic lives here; inject a client built with
//! [`ReqwestWithSiwx`](crate::ReqwestWithSiwx) (and, for paid endpoints, an
//! x402 payment middleware).
//!
//! Chat completions deliberately return the raw [`reqwest::Response`] so
//! callers can branch on 200 vs. 402 and consume streamed bodies; the balance
//! query converts non-2xx into a descriptive [`ApiClientError::Api`].

use http::StatusCode;
use reqwest::Response;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::instrument;

/// A session's balance as reported by `GET /api/v1/session/balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBalance {
    /// CAIP-10 account identifier the session is bound to.
    pub caip_account_id: String,
    /// Remaining balance in micro-USDC.
    pub balance_micro_usdc: u64,
    /// Remaining balance in USD.
    pub balance_usd: f64,
}

/// Errors from the typed API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        context: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP error: {context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// Non-2xx response; `message` carries the server's JSON `error` field
    /// when present, the raw body otherwise.
    #[error("API request failed with HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// A client for the remote chat/balance API.
///
/// ## Example
///
/// ```rust,ignore
/// use siwx_reqwest::{ApiClient, ChainId, ReqwestWithSiwx, ReqwestWithSiwxBuild, SiwxClient};
///
/// let http = reqwest::Client::new().with_siwx(siwx).build();
/// let api = ApiClient::try_new("https://api.example.com".parse()?, http)?;
/// let balance = api.session_balance().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL of the API (e.g. `https://api.example.com/`)
    base_url: Url,
    /// Full URL to `POST /api/v1/chat/completions`
    chat_completions_url: Url,
    /// Full URL to `GET /api/v1/session/balance`
    session_balance_url: Url,
    /// The authenticated (and payment-aware) transport
    http: ClientWithMiddleware,
}

impl ApiClient {
    /// Constructs a new [`ApiClient`] from a base URL and a transport.
    ///
    /// Endpoint URLs are resolved relative to the base at construction time.
    pub fn try_new(base_url: Url, http: ClientWithMiddleware) -> Result<Self, ApiClientError> {
        let chat_completions_url =
            base_url
                .join("./api/v1/chat/completions")
                .map_err(|e| ApiClientError::UrlParse {
                    context: "Failed to construct chat completions URL",
                    source: e,
                })?;
        let session_balance_url =
            base_url
                .join("./api/v1/session/balance")
                .map_err(|e| ApiClientError::UrlParse {
                    context: "Failed to construct session balance URL",
                    source: e,
                })?;
        Ok(Self {
            base_url,
            chat_completions_url,
            session_balance_url,
            http,
        })
    }

    /// Returns the base URL used by this client.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Posts an OpenAI-compatible chat completion request.
    ///
    /// Returns the raw response so callers can distinguish 200 from 402 and
    /// read streamed bodies; no status is converted into an error here.
    #[cfg_attr(feature = "telemetry", instrument(name = "siwx.api.chat_completions", skip_all, err))]
    pub async fn chat_completions(
        &self,
        body: &serde_json::Value,
    ) -> Result<Response, ApiClientError> {
        self.http
            .post(self.chat_completions_url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiClientError::Http {
                context: "Failed to POST chat completions",
                source: e,
            })
    }

    /// Fetches the session balance.
    ///
    /// # Errors
    ///
    /// [`ApiClientError::Api`] on any non-2xx status, with the server's JSON
    /// `error` field (or raw body) embedded in the message.
    #[cfg_attr(feature = "telemetry", instrument(name = "siwx.api.session_balance", skip_all, err))]
    pub async fn session_balance(&self) -> Result<SessionBalance, ApiClientError> {
        let response = self
            .http
            .get(self.session_balance_url.clone())
            .send()
            .await
            .map_err(|e| ApiClientError::Http {
                context: "Failed to GET session balance",
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").cloned())
                .map(|e| match e {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(body);
            return Err(ApiClientError::Api { status, message });
        }

        response
            .json::<SessionBalance>()
            .await
            .map_err(|e| ApiClientError::JsonDeserialization {
                context: "Failed to parse session balance response",
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plain_client() -> ClientWithMiddleware {
        reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build()
    }

    async fn api_for(mock_server: &MockServer) -> ApiClient {
        ApiClient::try_new(mock_server.uri().parse().unwrap(), plain_client()).unwrap()
    }

    #[test]
    fn test_endpoint_urls_resolve_relative_to_base() {
        let api = ApiClient::try_new(
            "https://api.example.com".parse().unwrap(),
            plain_client(),
        )
        .unwrap();
        assert_eq!(
            api.chat_completions_url.as_str(),
            "https://api.example.com/api/v1/chat/completions"
        );
        assert_eq!(
            api.session_balance_url.as_str(),
            "https://api.example.com/api/v1/session/balance"
        );
    }

    #[tokio::test]
    async fn test_session_balance_parses_documented_fields() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/session/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "caip_account_id": "eip155:8453:0xABC",
                "balance_micro_usdc": 1_500_000,
                "balance_usd": 1.5,
            })))
            .mount(&mock_server)
            .await;

        let balance = api_for(&mock_server).await.session_balance().await.unwrap();
        assert_eq!(balance.caip_account_id, "eip155:8453:0xABC");
        assert_eq!(balance.balance_micro_usdc, 1_500_000);
        assert_eq!(balance.balance_usd, 1.5);
    }

    #[tokio::test]
    async fn test_session_balance_missing_field_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/session/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "caip_account_id": "eip155:8453:0xABC",
            })))
            .mount(&mock_server)
            .await;

        let err = api_for(&mock_server).await.session_balance().await.unwrap_err();
        assert!(matches!(err, ApiClientError::JsonDeserialization { .. }));
    }

    #[tokio::test]
    async fn test_session_balance_embeds_json_error_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/session/balance"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "assertion expired"})),
            )
            .mount(&mock_server)
            .await;

        let err = api_for(&mock_server).await.session_balance().await.unwrap_err();
        match err {
            ApiClientError::Api { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "assertion expired");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_session_balance_embeds_raw_body_when_not_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/session/balance"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&mock_server)
            .await;

        let err = api_for(&mock_server).await.session_balance().await.unwrap_err();
        match err {
            ApiClientError::Api { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_chat_completions_returns_raw_402_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
            .mount(&mock_server)
            .await;

        let response = api_for(&mock_server)
            .await
            .chat_completions(&serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}],
            }))
            .await
            .unwrap();

        assert_eq!(response.status(), 402);
        assert_eq!(response.text().await.unwrap(), "payment required");
    }

    #[tokio::test]
    async fn test_chat_completions_posts_caller_body_verbatim() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&mock_server)
            .await;

        let body = serde_json::json!({"model": "m", "stream": true});
        let response = api_for(&mock_server).await.chat_completions(&body).await.unwrap();
        assert_eq!(response.status(), 200);

        let requests = mock_server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent, body);
    }
}
