//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use vidtube_common::{AppResult, Page};
use vidtube_core::{LikedVideo, ToggleOutcome};
use vidtube_db::entities::{like, like::LikeTarget};

use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{video_id}", post(toggle_video_like))
        .route("/toggle/c/{comment_id}", post(toggle_comment_like))
        .route("/toggle/t/{tweet_id}", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}

async fn toggle(
    state: &AppState,
    user_id: &str,
    kind: LikeTarget,
    target_id: &str,
) -> AppResult<ApiResponse<ToggleOutcome<like::Model>>> {
    let outcome = state.like_service.toggle(user_id, kind, target_id).await?;
    let message = if outcome.is_active() {
        format!("{} liked", kind.label())
    } else {
        format!("{} unliked", kind.label())
    };
    Ok(ApiResponse::ok(outcome, message))
}

async fn toggle_video_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome<like::Model>>> {
    toggle(&state, &user.id, LikeTarget::Video, &video_id).await
}

async fn toggle_comment_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome<like::Model>>> {
    toggle(&state, &user.id, LikeTarget::Comment, &comment_id).await
}

async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome<like::Model>>> {
    toggle(&state, &user.id, LikeTarget::Tweet, &tweet_id).await
}

async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<LikedVideo>>> {
    let videos = state.like_service.liked_videos(&user.id, page).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched"))
}
