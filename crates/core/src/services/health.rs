//! Liveness report.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use vidtube_common::{AppError, AppResult};

/// Result of a dependency check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: String,
    pub latency_ms: u64,
}

/// Health report served by the healthcheck endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
    pub database: CheckResult,
}

#[derive(Clone)]
pub struct HealthService {
    db: Arc<DatabaseConnection>,
    started_at: Instant,
}

impl HealthService {
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            started_at: Instant::now(),
        }
    }

    /// Ping the database and report uptime. An unreachable database is `Unavailable`.
    pub async fn report(&self) -> AppResult<HealthReport> {
        let start = Instant::now();
        self.db.ping().await.map_err(|e| {
            tracing::warn!(error = %e, "Database ping failed");
            AppError::Unavailable(format!("Database unreachable: {e}"))
        })?;

        Ok(HealthReport {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            timestamp: Utc::now(),
            database: CheckResult {
                status: "connected".to_string(),
                latency_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
        })
    }
}
