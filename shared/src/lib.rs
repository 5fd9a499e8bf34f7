//! Shared library for the wellness insights Lambda functions.
//!
//! This crate holds the insight engine (diagnosis client, response
//! normalizer, fallback rules) together with the configuration, error and
//! HTTP plumbing used by every Lambda.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod fallback;
pub mod http;
pub mod insights;
pub mod models;
pub mod normalizer;
pub mod secrets;
pub mod session;
pub mod summary;
pub mod symptoms;

pub use config::Config;
pub use diagnosis::{DiagnosisApi, DiagnosisClient, DiagnosisRequest};
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use http::{error_from, error_response, json_response, ApiResponse};
pub use insights::{InsightOutcome, InsightService, InsightSource};
pub use models::{
    ActivityLevel, DietType, HealthProfile, InsightResult, Lifestyle, MedicalAdvice, Pattern,
    Recommendation, Severity, SleepQuality, WellnessInput,
};
pub use secrets::{get_secret, resolve_api_key};
pub use session::{LoadingIndicator, Step, TagField, WellnessSession};
pub use summary::{group_recommendations, summarize, InsightSummary, RecommendationGroup};
