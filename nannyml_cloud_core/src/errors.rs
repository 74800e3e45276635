//! Core error types for the NannyML Cloud SDK.
//!
//! Local validation failures (`InvalidArgument`, `NotFound`, `InvalidState`)
//! are raised before anything is sent to the network. Remote failures are
//! surfaced unchanged as `Api` or `License`; nothing in this crate retries.

use crate::http::HttpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Details of a request the API rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorInfo {
    /// Error message (first GraphQL error, or the HTTP failure summary)
    pub message: String,
    /// HTTP status code, when the rejection happened at the HTTP layer
    pub status: Option<u16>,
    /// GraphQL error code from `extensions.code`, if provided
    pub code: Option<String>,
    /// Body snippet for HTTP-level rejections (for debugging)
    pub body_snippet: Option<String>,
}

impl std::fmt::Display for ApiErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "API error (HTTP {}): {}", status, self.message)?,
            None => write!(f, "API error: {}", self.message)?,
        }
        if let Some(ref code) = self.code {
            write!(f, " (code: {})", code)?;
        }
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// License/entitlement denial details.
///
/// Raised when the API answers 403 with a `{"type": "LicenseError"}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseErrorInfo {
    /// Server-provided explanation
    pub detail: String,
    /// URL of the rejected request
    pub url: String,
}

impl std::fmt::Display for LicenseErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "license error for {}", self.url)
        } else {
            write!(f, "license error: {}", self.detail)
        }
    }
}

/// Unified error enum for all NannyML Cloud core errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad local input to an operation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup of an unknown metric, method, model or data source
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal inconsistency (e.g. an unrecognized discriminant)
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The API rejected the request
    #[error("{0}")]
    Api(ApiErrorInfo),

    /// The API denied the request for licensing reasons
    #[error("{0}")]
    License(LicenseErrorInfo),

    /// HTTP request failed (network layer)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("url parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Response did not have the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl CoreError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    /// Create an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidState(message.into())
    }

    /// Create an API error from a GraphQL error message.
    pub fn api(message: impl Into<String>, code: Option<&str>) -> Self {
        CoreError::Api(ApiErrorInfo {
            message: message.into(),
            status: None,
            code: code.map(String::from),
            body_snippet: None,
        })
    }

    /// Create an API error from an HTTP rejection.
    pub fn http_rejection(status: u16, message: &str, body: Option<&str>) -> Self {
        CoreError::Api(ApiErrorInfo {
            message: message.to_string(),
            status: Some(status),
            code: None,
            body_snippet: body.map(|s| s.chars().take(200).collect()),
        })
    }

    /// Create a license error.
    pub fn license(detail: impl Into<String>, url: &str) -> Self {
        CoreError::License(LicenseErrorInfo {
            detail: detail.into(),
            url: url.to_string(),
        })
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        CoreError::Config(message.into())
    }

    /// Check if the API rejected the request. License denials count.
    pub fn is_api_error(&self) -> bool {
        matches!(self, CoreError::Api(_) | CoreError::License(_))
    }

    /// Check if this is a license denial.
    pub fn is_license_error(&self) -> bool {
        matches!(self, CoreError::License(_))
    }

    /// Check if the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidArgument(_) | CoreError::NotFound(_) | CoreError::InvalidState(_)
        )
    }

    /// Get HTTP status code if the error came from an HTTP response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CoreError::Api(info) => info.status,
            CoreError::License(_) => Some(403),
            CoreError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<HttpError> for CoreError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) => CoreError::Http(e),
            HttpError::Response(detail) => {
                if let Some(license) = detail.license_denial() {
                    return CoreError::License(license);
                }
                CoreError::Api(ApiErrorInfo {
                    message: detail.message,
                    status: Some(detail.status),
                    code: None,
                    body_snippet: detail.body_snippet,
                })
            }
            HttpError::InvalidHeader(msg) => CoreError::Config(msg),
            HttpError::JsonParse(msg) => CoreError::Protocol(msg),
        }
    }
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
