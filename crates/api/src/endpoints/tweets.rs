//! Tweet endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidtube_common::{AppResult, Page};
use vidtube_core::TweetInput;
use vidtube_db::entities::tweet;

use crate::{
    extractors::{AuthUser, JsonBody, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/{user_id}", get(user_tweets))
        .route("/{tweet_id}", patch(update_tweet).delete(delete_tweet))
}

async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<TweetInput>,
) -> AppResult<ApiResponse<tweet::Model>> {
    let tweet = state.tweet_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(tweet, "Tweet created"))
}

async fn user_tweets(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<tweet::Model>>> {
    let tweets = state.tweet_service.list_by_user(&user_id, page).await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched"))
}

async fn update_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    JsonBody(input): JsonBody<TweetInput>,
) -> AppResult<ApiResponse<tweet::Model>> {
    let tweet = state.tweet_service.update(&user.id, &tweet_id, input).await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated"))
}

async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<tweet::Model>> {
    let tweet = state.tweet_service.delete(&user.id, &tweet_id).await?;
    Ok(ApiResponse::ok(tweet, "Tweet deleted"))
}
