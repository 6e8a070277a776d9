//! API endpoints.

mod comments;
mod dashboard;
mod healthcheck;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod videos;

use axum::Router;
use vidtube_common::AppError;

use crate::middleware::AppState;

/// Path prefix the router is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/healthcheck", healthcheck::router())
        .nest("/videos", videos::router())
        .nest("/comments", comments::router())
        .nest("/likes", likes::router())
        .nest("/tweets", tweets::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/playlists", playlists::router())
        .nest("/dashboard", dashboard::router())
        .fallback(route_not_found)
}

/// Fallback for unknown paths, rendered as the error envelope.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
