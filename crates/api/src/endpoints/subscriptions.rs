//! Subscription endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use vidtube_common::{AppResult, Page};
use vidtube_core::{ChannelEntry, SubscriberEntry, ToggleOutcome};
use vidtube_db::entities::subscription;

use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channel_id}",
            get(channel_subscribers).post(toggle_subscription),
        )
        .route("/u/{subscriber_id}", get(subscribed_channels))
}

async fn toggle_subscription(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome<subscription::Model>>> {
    let outcome = state
        .subscription_service
        .toggle(&user.id, &channel_id)
        .await?;
    let message = if outcome.is_active() {
        "Subscribed to channel"
    } else {
        "Unsubscribed from channel"
    };
    Ok(ApiResponse::ok(outcome, message))
}

async fn channel_subscribers(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<SubscriberEntry>>> {
    let subscribers = state
        .subscription_service
        .subscribers(&channel_id, page)
        .await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched"))
}

async fn subscribed_channels(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<ChannelEntry>>> {
    let channels = state
        .subscription_service
        .subscribed_channels(&subscriber_id, page)
        .await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched"))
}
