//! Configuration management for Lambda functions.

use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Diagnosis API endpoint
    pub diagnosis_api_url: String,
    /// Host identifier sent alongside the API key
    pub diagnosis_api_host: String,
    /// Inline API key (takes precedence over the secret)
    pub diagnosis_api_key: Option<String>,
    /// ARN of the secret containing the API key
    pub api_key_secret_arn: Option<String>,
    /// Client-side request timeout
    pub request_timeout: Option<Duration>,
    /// AWS region
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_source(|key| env::var(key))
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_source<F>(var: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |key: &str| var(key).ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            diagnosis_api_url: var("DIAGNOSIS_API_URL")?,
            diagnosis_api_host: var("DIAGNOSIS_API_HOST")?,
            diagnosis_api_key: optional("DIAGNOSIS_API_KEY"),
            api_key_secret_arn: optional("DIAGNOSIS_API_KEY_SECRET_ARN"),
            request_timeout: optional("DIAGNOSIS_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs),
            aws_region: var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        })
    }
}
