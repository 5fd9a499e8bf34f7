//! Error types for the wellness insights service.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the wellness insights service.
#[derive(Error, Debug)]
pub enum Error {
    /// Diagnosis API error
    #[error("Diagnosis API error: {0}")]
    Api(#[from] ApiError),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request is already in flight for this session
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Conflict(_) => 409,
            _ => 500,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Validation(errors.to_string())
    }
}

/// Classification of a failed diagnosis API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    RateLimited,
    BadRequest,
    ServerError,
    ServiceUnavailable,
    Other,
    ParseError,
    NetworkError,
}

impl ApiErrorKind {
    /// Map a non-2xx HTTP status to its kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            429 => ApiErrorKind::RateLimited,
            500 => ApiErrorKind::ServerError,
            503 => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::Other,
        }
    }

    fn reason(&self) -> Option<&'static str> {
        match self {
            ApiErrorKind::Forbidden => Some(
                "(Forbidden) - Possible reasons: Invalid API key, expired subscription, or insufficient permissions",
            ),
            ApiErrorKind::Unauthorized => Some("(Unauthorized) - Invalid or missing API key"),
            ApiErrorKind::RateLimited => {
                Some("(Too Many Requests) - Rate limit exceeded, try again later")
            }
            ApiErrorKind::BadRequest => Some("(Bad Request) - Invalid request data format"),
            ApiErrorKind::ServerError => {
                Some("(Internal Server Error) - Server error, try again later")
            }
            ApiErrorKind::ServiceUnavailable => {
                Some("(Service Unavailable) - API temporarily unavailable")
            }
            _ => None,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::RateLimited => "rate_limited",
            ApiErrorKind::BadRequest => "bad_request",
            ApiErrorKind::ServerError => "server_error",
            ApiErrorKind::ServiceUnavailable => "service_unavailable",
            ApiErrorKind::Other => "other",
            ApiErrorKind::ParseError => "parse_error",
            ApiErrorKind::NetworkError => "network_error",
        };
        f.write_str(name)
    }
}

/// Maximum number of characters of an error body kept as detail.
pub const MAX_DETAIL_CHARS: usize = 200;

/// A failed call to the diagnosis API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{}", headline(.kind, .http_status), detail_suffix(.detail))]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub http_status: Option<u16>,
    pub detail: Option<String>,
}

impl ApiError {
    /// Error for a non-2xx response. The body, if any, is truncated to
    /// [`MAX_DETAIL_CHARS`] characters.
    pub fn from_status(status: u16, body: Option<&str>) -> Self {
        let detail = body
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|b| b.chars().take(MAX_DETAIL_CHARS).collect());

        Self {
            kind: ApiErrorKind::from_status(status),
            http_status: Some(status),
            detail,
        }
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::ParseError,
            http_status: None,
            detail: Some(detail.into()),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::NetworkError,
            http_status: None,
            detail: Some(detail.into()),
        }
    }
}

fn headline(kind: &ApiErrorKind, http_status: &Option<u16>) -> String {
    match (http_status, kind.reason()) {
        (Some(status), Some(reason)) => {
            format!("API request failed with status {} {}", status, reason)
        }
        (Some(status), None) => format!("API request failed with status {}", status),
        (None, _) if *kind == ApiErrorKind::ParseError => {
            "Failed to parse API response as JSON".to_string()
        }
        (None, _) => "Failed to call API".to_string(),
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" - Details: {}", d),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::RateLimited);
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::ServerError);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::ServiceUnavailable);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Other);
        assert_eq!(ApiErrorKind::from_status(502), ApiErrorKind::Other);
    }

    #[test]
    fn test_detail_is_truncated() {
        let body = "x".repeat(500);
        let err = ApiError::from_status(500, Some(&body));
        assert_eq!(err.detail.as_ref().map(|d| d.chars().count()), Some(MAX_DETAIL_CHARS));
    }

    #[test]
    fn test_empty_body_has_no_detail() {
        let err = ApiError::from_status(503, Some("   "));
        assert_eq!(err.detail, None);
        assert_eq!(err.http_status, Some(503));
    }

    #[test]
    fn test_display_includes_reason_and_detail() {
        let err = ApiError::from_status(403, Some("subscription expired"));
        let message = err.to_string();
        assert!(message.starts_with("API request failed with status 403 (Forbidden)"));
        assert!(message.ends_with(" - Details: subscription expired"));
    }

    #[test]
    fn test_api_error_status_code_is_internal() {
        let err: Error = ApiError::network("connection refused").into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(Error::Conflict("busy".into()).status_code(), 409);
    }
}
