//! Symptoms Lambda - Handles GET /v1/symptoms.
//!
//! Serves the built-in symptom list used by the questionnaire's first step,
//! optionally filtered with `?q=`.

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use shared::symptoms;
use shared::{error_response, json_response, ApiResponse};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let raw_path = event.uri().path();
    // API Gateway REST stages prefix the path
    let path = raw_path.strip_prefix("/api").unwrap_or(raw_path);
    let method = event.method().as_str();

    match (method, path) {
        ("GET", "/v1/symptoms") => {
            let params = event.query_string_parameters();
            let query = params
                .first("q")
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from);

            let symptoms = symptoms::search(query.as_deref().unwrap_or(""));
            info!(query = ?query, matches = symptoms.len(), "Symptom search");

            json_response(200, &ApiResponse::success(symptoms))
        }
        ("GET", _) => error_response(404, "Not found"),
        _ => error_response(405, "Method not allowed"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(handler)).await
}
