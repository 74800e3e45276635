//! HTTP client for NannyML Cloud API calls.
//!
//! This module provides an async HTTP client with `ApiToken` authentication
//! and error details rich enough to recognise license denials.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::errors::LicenseErrorInfo;

/// Max idle connections kept per host.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// HTTP error details.
#[derive(Debug, Clone)]
pub struct HttpErrorDetail {
    pub status: u16,
    pub url: String,
    pub message: String,
    pub body_snippet: Option<String>,
}

impl HttpErrorDetail {
    /// Interpret a 403 body of the form `{"type": "LicenseError", "detail": ...}`.
    pub fn license_denial(&self) -> Option<LicenseErrorInfo> {
        if self.status != 403 {
            return None;
        }
        let body: Value = serde_json::from_str(self.body_snippet.as_deref()?).ok()?;
        if body.get("type").and_then(|v| v.as_str()) != Some("LicenseError") {
            return None;
        }
        let detail = body
            .get("detail")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Some(LicenseErrorInfo {
            detail,
            url: self.url.clone(),
        })
    }
}

impl std::fmt::Display for HttpErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} for {}: {}", self.status, self.url, self.message)?;
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0} (is_connect={is_connect}, is_timeout={is_timeout})", is_connect = .0.is_connect(), is_timeout = .0.is_timeout())]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Response(HttpErrorDetail),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("json parse error: {0}")]
    JsonParse(String),
}

impl HttpError {
    /// Create an HTTP error from a response.
    pub fn from_response(status: u16, url: &str, body: Option<&str>) -> Self {
        // Keep the whole structured body (up to 4 KiB) so license denials can
        // be parsed; Display truncates to 200 chars.
        let body_snippet = body.map(|s| s.chars().take(4096).collect());
        HttpError::Response(HttpErrorDetail {
            status,
            url: url.to_string(),
            message: "request_failed".to_string(),
            body_snippet,
        })
    }

    /// Get the HTTP status code, if available.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Response(detail) => Some(detail.status),
            HttpError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Async HTTP client for the NannyML Cloud API.
///
/// # Example
///
/// ```ignore
/// let client = HttpClient::new("https://cloud.example.com", "token", 30, "nannyml-cloud-rs")?;
/// let value: Value = client.post_json("/api/graphql", &body).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// An empty `api_token` sends no `Authorization` header, which is what
    /// unauthenticated on-prem deployments expect.
    pub fn new(
        base_url: &str,
        api_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();

        if !api_token.is_empty() {
            let auth_value = format!("ApiToken {}", api_token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|_| HttpError::InvalidHeader("api token contains invalid characters".to_string()))?,
            );
        }
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(DEFAULT_POOL_SIZE)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(HttpError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert a relative path to an absolute URL.
    pub(crate) fn abs_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = path.trim_start_matches('/');

        if self.base_url.ends_with("/api") && path.starts_with("api/") {
            return format!("{}/{}", self.base_url, &path[4..]);
        }

        format!("{}/{}", self.base_url, path)
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.abs_url(path);
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        parse_json(status, &url, &bytes)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn parse_json<T: DeserializeOwned>(status: u16, url: &str, body: &[u8]) -> Result<T, HttpError> {
    if !(200..300).contains(&status) {
        let text = String::from_utf8_lossy(body);
        return Err(HttpError::from_response(
            status,
            url,
            if text.trim().is_empty() { None } else { Some(&text) },
        ));
    }

    serde_json::from_slice(body).map_err(|e| {
        let text = String::from_utf8_lossy(body);
        let preview: String = text.chars().take(100).collect();
        HttpError::JsonParse(format!("{}: {}", e, preview))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_abs_url_relative() {
        let client = HttpClient::new("https://cloud.example.com", "t", 30, "test").unwrap();
        assert_eq!(client.abs_url("/api/graphql"), "https://cloud.example.com/api/graphql");
        assert_eq!(client.abs_url("api/graphql"), "https://cloud.example.com/api/graphql");
    }

    #[test]
    fn test_api_token_with_newline_is_invalid_header() {
        let err = HttpClient::new("https://cloud.example.com", "tok\nen", 30, "test").unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeader(_)));
    }

    #[test]
    fn test_abs_url_api_prefix_dedup() {
        let client = HttpClient::new("https://cloud.example.com/api", "t", 30, "test").unwrap();
        assert_eq!(client.abs_url("api/graphql"), "https://cloud.example.com/api/graphql");
    }

    #[test]
    fn test_license_denial_parsed_from_403_body() {
        let err = HttpError::from_response(
            403,
            "https://cloud.example.com/api/graphql",
            Some(r#"{"type": "LicenseError", "detail": "license expired"}"#),
        );
        let HttpError::Response(detail) = err else {
            panic!("expected response error");
        };
        let license = detail.license_denial().unwrap();
        assert_eq!(license.detail, "license expired");
    }

    #[test]
    fn test_plain_403_is_not_license_denial() {
        let err = HttpError::from_response(403, "https://x", Some(r#"{"detail": "forbidden"}"#));
        let HttpError::Response(detail) = err else {
            panic!("expected response error");
        };
        assert!(detail.license_denial().is_none());
    }

    #[tokio::test]
    async fn test_post_json_sends_api_token_header() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .header("authorization", "ApiToken secret");
                then.status(200).json_body(json!({"ok": true}));
            })
            .await;

        let client = HttpClient::new(&server.base_url(), "secret", 5, "test").unwrap();
        let value: Value = client.post_json("/api/graphql", &json!({})).await.unwrap();
        assert_eq!(value["ok"], true);
        m.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_post_json_non_2xx_is_response_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(502).body("bad gateway");
            })
            .await;

        let client = HttpClient::new(&server.base_url(), "", 5, "test").unwrap();
        let err = client
            .post_json::<_, Value>("/api/graphql", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }
}
