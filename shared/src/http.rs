//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::Error;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?;
    Ok(response)
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ApiResponse::error(message))
}

/// Render a crate error with the status code it maps to.
pub fn error_from(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    error_response(err.status_code(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope() {
        let body = serde_json::to_value(ApiResponse::error("Missing request body")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "Missing request body"}));
    }

    #[test]
    fn test_error_from_uses_status_code() {
        let response = error_from(&Error::Validation("age: range".to_string())).unwrap();
        assert_eq!(response.status(), 400);
        match response.body() {
            Body::Text(text) => assert!(text.contains("Validation error: age: range")),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_json_response_status_and_header() {
        let response = json_response(201, &ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.headers()["content-type"], "application/json");
        match response.body() {
            Body::Text(text) => assert_eq!(text, r#"{"success":true,"data":[1,2]}"#),
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
