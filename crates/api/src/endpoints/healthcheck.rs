//! Healthcheck endpoint.

use axum::{Router, extract::State, routing::get};
use vidtube_common::AppResult;
use vidtube_core::HealthReport;

use crate::{middleware::AppState, response::ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(healthcheck))
}

/// Report uptime and database reachability. 503 when the database is down.
async fn healthcheck(State(state): State<AppState>) -> AppResult<ApiResponse<HealthReport>> {
    let report = state.health_service.report().await?;
    Ok(ApiResponse::ok(report, "Service is healthy"))
}
