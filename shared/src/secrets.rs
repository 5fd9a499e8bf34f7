//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Config, Error, Result};

/// Secret strings by ARN, kept for the life of the Lambda container.
static SECRET_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn secret_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRET_CACHE.get_or_init(Default::default)
}

/// Diagnosis API credentials stored as a JSON secret.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Fetch a secret string, hitting Secrets Manager at most once per ARN.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    if let Some(cached) = secret_cache().read().await.get(secret_arn).cloned() {
        debug!(secret_arn, "Using cached secret");
        return Ok(cached);
    }

    let output = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Secrets Manager lookup failed: {}", e)))?;

    let value = output
        .secret_string()
        .map(str::to_owned)
        .ok_or_else(|| Error::Aws(format!("Secret {} has no string value", secret_arn)))?;

    secret_cache()
        .write()
        .await
        .insert(secret_arn.to_owned(), value.clone());

    Ok(value)
}

/// Extract the API key from a secret string.
///
/// Accepts either a JSON document `{"apiKey": "..."}` or the bare key.
pub fn parse_api_key(secret_string: &str) -> Result<String> {
    let trimmed = secret_string.trim();
    if trimmed.starts_with('{') {
        let secret: ApiKeySecret = serde_json::from_str(trimmed)?;
        return Ok(secret.api_key);
    }
    if trimmed.is_empty() {
        return Err(Error::Config("API key secret is empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Resolve the diagnosis API key, preferring the inline value over the secret.
pub async fn resolve_api_key(config: &Config) -> Result<String> {
    if let Some(key) = &config.diagnosis_api_key {
        return Ok(key.clone());
    }

    let secret_arn = config.api_key_secret_arn.as_deref().ok_or_else(|| {
        Error::Config(
            "Neither DIAGNOSIS_API_KEY nor DIAGNOSIS_API_KEY_SECRET_ARN is set".to_string(),
        )
    })?;

    debug!("Loading diagnosis API key from Secrets Manager");
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let client = SecretsClient::new(&aws_config);
    let secret_string = get_secret(&client, secret_arn).await?;

    parse_api_key(&secret_string)
}
