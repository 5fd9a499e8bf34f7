//! Client for the third-party diagnosis API.
//!
//! Builds the request payload from a [`WellnessInput`], performs a single
//! POST and classifies any failure as an [`ApiError`]. The response body is
//! returned as an untyped JSON tree; interpreting it is the job of
//! [`crate::normalizer`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{ActivityLevel, DietType, WellnessInput};
use crate::{Config, Error, Result};

const DEFAULT_AGE: u32 = 35;
const DEFAULT_HEIGHT_CM: f64 = 170.0;
const DEFAULT_WEIGHT_KG: f64 = 70.0;
const DEFAULT_GENDER: &str = "female";
const EMPTY_SYMPTOMS_PLACEHOLDER: &str = "general wellness check";

/// Request body sent to the diagnosis API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRequest {
    pub symptoms: Vec<String>,
    pub patient_info: PatientInfo,
    pub lang: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub age: u32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub medical_history: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    pub lifestyle: PatientLifestyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientLifestyle {
    pub smoking: bool,
    pub alcohol: &'static str,
    pub exercise: &'static str,
    pub diet: &'static str,
}

impl DiagnosisRequest {
    /// Map questionnaire answers onto the API's vocabulary, filling defaults.
    pub fn from_input(input: &WellnessInput) -> Self {
        let profile = &input.health_profile;
        let lifestyle = &input.lifestyle;

        let symptoms = if input.symptoms.is_empty() {
            vec![EMPTY_SYMPTOMS_PLACEHOLDER.to_string()]
        } else {
            input.symptoms.clone()
        };

        Self {
            symptoms,
            patient_info: PatientInfo {
                age: profile.known_age().unwrap_or(DEFAULT_AGE),
                gender: normalize_gender(profile.gender.as_deref()),
                height: profile.known_height().unwrap_or(DEFAULT_HEIGHT_CM),
                weight: profile.known_weight().unwrap_or(DEFAULT_WEIGHT_KG),
                medical_history: profile.medical_history.clone(),
                current_medications: profile.medications.clone(),
                allergies: profile.allergies.clone(),
                lifestyle: PatientLifestyle {
                    smoking: false,
                    alcohol: alcohol_consumption(lifestyle.stress_level),
                    exercise: exercise_descriptor(lifestyle.activity_level),
                    diet: diet_descriptor(lifestyle.diet_type),
                },
            },
            lang: "en",
        }
    }
}

pub fn exercise_descriptor(level: ActivityLevel) -> &'static str {
    match level {
        ActivityLevel::Sedentary => "none",
        ActivityLevel::Light => "light",
        ActivityLevel::Moderate => "moderate",
        ActivityLevel::Active => "active",
        ActivityLevel::VeryActive => "very active",
        ActivityLevel::Unspecified => "moderate",
    }
}

pub fn diet_descriptor(diet: DietType) -> &'static str {
    match diet {
        DietType::Vegetarian => "vegetarian",
        DietType::Vegan => "vegan",
        DietType::Keto => "keto",
        DietType::Paleo => "paleo",
        DietType::Mediterranean => "mediterranean",
        DietType::Omnivore | DietType::Other | DietType::Unspecified => "balanced",
    }
}

/// The questionnaire has no alcohol question, so stress stands in for it.
///
/// High and low stress both map to "occasional". This looks like a defect
/// in the mapping but is kept until product intent is clarified.
pub fn alcohol_consumption(stress_level: u8) -> &'static str {
    if stress_level >= 7 {
        "occasional"
    } else if stress_level >= 4 {
        "moderate"
    } else {
        "occasional"
    }
}

/// Lowercase the gender; unspecified answers default to "female".
pub fn normalize_gender(gender: Option<&str>) -> String {
    match gender.map(str::trim) {
        None | Some("") => DEFAULT_GENDER.to_string(),
        Some(g) if g.eq_ignore_ascii_case("prefer-not-to-say") => DEFAULT_GENDER.to_string(),
        Some(g) => g.to_lowercase(),
    }
}

/// Anything that can turn a wellness input into a raw diagnosis payload.
#[async_trait]
pub trait DiagnosisApi: Send + Sync {
    async fn submit(&self, input: &WellnessInput) -> std::result::Result<Value, ApiError>;
}

/// HTTP client for the diagnosis API.
pub struct DiagnosisClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    api_host: String,
}

impl DiagnosisClient {
    /// Create a new diagnosis client.
    pub fn new(
        http_client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        api_host: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }

    /// Build a client from configuration and a resolved API key.
    pub fn from_config(config: &Config, api_key: String) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            http_client,
            config.diagnosis_api_url.clone(),
            api_key,
            config.diagnosis_api_host.clone(),
        ))
    }

    async fn send(&self, request: &DiagnosisRequest) -> std::result::Result<Value, ApiError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(ApiError::from_status(status.as_u16(), body.as_deref()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::parse(e.to_string()))
    }
}

#[async_trait]
impl DiagnosisApi for DiagnosisClient {
    /// Issue exactly one request. No retries.
    async fn submit(&self, input: &WellnessInput) -> std::result::Result<Value, ApiError> {
        let request = DiagnosisRequest::from_input(input);
        let outcome = self.send(&request).await;

        match &outcome {
            Ok(_) => info!(symptoms = request.symptoms.len(), "API request: success"),
            Err(e) => warn!(kind = %e.kind, status = ?e.http_status, error = %e, "API request: failed"),
        }

        outcome
    }
}
