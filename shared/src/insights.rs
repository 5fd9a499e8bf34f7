//! Insight generation: diagnosis API first, local rules when it fails.

use serde::Serialize;
use tracing::{info, warn};

use crate::diagnosis::DiagnosisApi;
use crate::error::ApiError;
use crate::fallback;
use crate::models::{InsightResult, WellnessInput};
use crate::normalizer;

/// Where an insight set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Api,
    Fallback,
}

/// Result of one insight request.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightOutcome {
    pub insights: InsightResult,
    pub source: InsightSource,
    /// Why the API was not used. Kept for logs, never shown to users.
    pub api_error: Option<ApiError>,
}

/// Orchestrates one diagnosis call and the normalize-or-fallback decision.
pub struct InsightService<C> {
    client: C,
}

impl<C: DiagnosisApi> InsightService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Produce insights for `input`. An API failure is never fatal.
    pub async fn generate(&self, input: &WellnessInput) -> InsightOutcome {
        match self.client.submit(input).await {
            Ok(raw) => {
                let insights = normalizer::normalize(&raw, input);
                info!(
                    patterns = insights.patterns.len(),
                    recommendations = insights.recommendations.len(),
                    "Insights generated from diagnosis API"
                );
                InsightOutcome {
                    insights,
                    source: InsightSource::Api,
                    api_error: None,
                }
            }
            Err(e) => {
                warn!(kind = %e.kind, "Diagnosis API unavailable, generating fallback insights");
                InsightOutcome {
                    insights: fallback::generate(input),
                    source: InsightSource::Fallback,
                    api_error: Some(e),
                }
            }
        }
    }
}
