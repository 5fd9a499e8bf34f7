//! Insights Lambda - Handles POST /v1/insights.
//!
//! Accepts a completed wellness questionnaire, asks the diagnosis API for an
//! analysis and returns normalized insights. When the API is unavailable the
//! response carries locally generated insights instead; callers only see
//! the difference through the `source` field.

use chrono::{DateTime, Utc};
use lambda_http::{run, service_fn, Body, Error, Request, RequestPayloadExt, Response};
use serde::Serialize;
use shared::{
    error_from, error_response, group_recommendations, json_response, resolve_api_key,
    summarize, ApiResponse, Config, DiagnosisClient, InsightResult, InsightService,
    InsightSource, InsightSummary, RecommendationGroup, WellnessInput,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightsResponse {
    request_id: Uuid,
    source: InsightSource,
    generated_at: DateTime<Utc>,
    insights: InsightResult,
    summary: InsightSummary,
    recommendation_groups: Vec<RecommendationGroup>,
}

/// Application state shared across requests.
struct AppState {
    insight_service: InsightService<DiagnosisClient>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()
            .map_err(|e| format!("Missing diagnosis API configuration: {}", e))?;
        let api_key = resolve_api_key(&config).await?;
        let client = DiagnosisClient::from_config(&config, api_key)?;

        info!(api_host = %config.diagnosis_api_host, "Diagnosis client configured");

        Ok(Self {
            insight_service: InsightService::new(client),
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method().as_str() != "POST" {
        return error_response(405, "Method not allowed");
    }

    let input: WellnessInput = match event.payload() {
        Ok(Some(input)) => input,
        Ok(None) => return error_response(400, "Missing request body"),
        Err(e) => return error_response(400, format!("Invalid request: {}", e)),
    };

    if let Err(e) = input.validate() {
        let err = shared::Error::from(e);
        warn!("Rejected wellness input: {}", err);
        return error_from(&err);
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, symptoms = input.symptoms.len(), "Generating insights");

    let outcome = state.insight_service.generate(&input).await;
    if let Some(api_error) = &outcome.api_error {
        error!(%request_id, kind = %api_error.kind, "Diagnosis API failed: {}", api_error);
    }

    let response = InsightsResponse {
        request_id,
        source: outcome.source,
        generated_at: Utc::now(),
        summary: summarize(&outcome.insights),
        recommendation_groups: group_recommendations(&outcome.insights),
        insights: outcome.insights,
    };

    json_response(200, &ApiResponse::success(response))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
