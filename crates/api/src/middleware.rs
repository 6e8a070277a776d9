//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use vidtube_common::MediaStoreHandle;
use vidtube_core::{
    CommentService, DashboardService, HealthService, LikeService, PlaylistService,
    SubscriptionService, TweetService, UserService, VideoService,
};
use vidtube_db::repositories::{
    CommentRepository, LikeRepository, PlaylistRepository, SubscriptionRepository,
    TweetRepository, UserRepository, VideoRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub video_service: VideoService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub tweet_service: TweetService,
    pub subscription_service: SubscriptionService,
    pub playlist_service: PlaylistService,
    pub dashboard_service: DashboardService,
    pub health_service: HealthService,
}

impl AppState {
    /// Wire every service to one connection pool and media store.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, media: MediaStoreHandle) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let video_repo = VideoRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let tweet_repo = TweetRepository::new(Arc::clone(&db));
        let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
        let playlist_repo = PlaylistRepository::new(Arc::clone(&db));

        Self {
            user_service: UserService::new(user_repo.clone()),
            video_service: VideoService::new(
                video_repo.clone(),
                user_repo.clone(),
                like_repo.clone(),
                comment_repo.clone(),
                media,
            ),
            comment_service: CommentService::new(
                comment_repo.clone(),
                video_repo.clone(),
                tweet_repo.clone(),
                like_repo.clone(),
            ),
            like_service: LikeService::new(
                like_repo.clone(),
                video_repo.clone(),
                tweet_repo.clone(),
                comment_repo.clone(),
            ),
            tweet_service: TweetService::new(
                tweet_repo,
                user_repo.clone(),
                comment_repo,
                like_repo.clone(),
            ),
            subscription_service: SubscriptionService::new(
                subscription_repo.clone(),
                user_repo.clone(),
            ),
            playlist_service: PlaylistService::new(playlist_repo, video_repo.clone(), user_repo),
            dashboard_service: DashboardService::new(video_repo, subscription_repo, like_repo),
            health_service: HealthService::new(db),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Requests without a valid token pass through; handlers
/// that need a user reject them via [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .map(str::to_string);

    if let Some(token) = token {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => tracing::debug!("Unknown bearer token"),
            Err(e) => tracing::warn!(error = %e, "Token lookup failed"),
        }
    }

    next.run(req).await
}
