//! Comment endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use vidtube_common::{AppResult, Page};
use vidtube_core::{CommentInput, CommentTarget, CommentView};
use vidtube_db::entities::comment;

use crate::{
    extractors::{AuthUser, JsonBody, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/video/{video_id}",
            get(video_comments).post(add_video_comment),
        )
        .route(
            "/tweet/{tweet_id}",
            get(tweet_comments).post(add_tweet_comment),
        )
        .route(
            "/c/{comment_id}",
            patch(update_comment).delete(delete_comment),
        )
}

async fn video_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    let comments = state
        .comment_service
        .list(&user.id, CommentTarget::Video, &video_id, page)
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched"))
}

async fn add_video_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .add(&user.id, CommentTarget::Video, &video_id, input)
        .await?;
    Ok(ApiResponse::created(comment, "Comment added"))
}

async fn tweet_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    let comments = state
        .comment_service
        .list(&user.id, CommentTarget::Tweet, &tweet_id, page)
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched"))
}

async fn add_tweet_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .add(&user.id, CommentTarget::Tweet, &tweet_id, input)
        .await?;
    Ok(ApiResponse::created(comment, "Comment added"))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .update(&user.id, &comment_id, input)
        .await?;
    Ok(ApiResponse::ok(comment, "Comment updated"))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state.comment_service.delete(&user.id, &comment_id).await?;
    Ok(ApiResponse::ok(comment, "Comment deleted"))
}
