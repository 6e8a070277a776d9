//! Channel dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use vidtube_common::{AppResult, Page};
use vidtube_core::ChannelStats;
use vidtube_db::entities::video;

use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}

async fn channel_stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelStats>> {
    let stats = state.dashboard_service.stats(&user.id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched"))
}

async fn channel_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<video::Model>>> {
    let videos = state.dashboard_service.videos(&user.id, page).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched"))
}
