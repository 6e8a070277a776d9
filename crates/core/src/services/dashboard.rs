//! Channel dashboard service.

use serde::Serialize;
use vidtube_common::{AppResult, Page, PageRequest, SortDirection};
use vidtube_db::{
    entities::video,
    repositories::{
        LikeRepository, LikesByKind, SubscriptionRepository, VideoFilter, VideoRepository,
        VideoSortKey,
    },
};

/// Aggregate numbers for one channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: u64,
    /// Likes received on the channel's videos.
    pub total_likes: u64,
    pub likes_given: LikesByKind,
}

/// Dashboard service for business logic.
#[derive(Clone)]
pub struct DashboardService {
    video_repo: VideoRepository,
    subscription_repo: SubscriptionRepository,
    like_repo: LikeRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        subscription_repo: SubscriptionRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            video_repo,
            subscription_repo,
            like_repo,
        }
    }

    /// Stats for the actor's own channel.
    pub async fn stats(&self, actor_id: &str) -> AppResult<ChannelStats> {
        let totals = self.video_repo.totals_for_owner(actor_id).await?;
        let total_subscribers = self.subscription_repo.count_subscribers(actor_id).await?;
        let total_likes = self.like_repo.count_received_on_videos(actor_id).await?;
        let likes_given = self.like_repo.count_given_by_kind(actor_id).await?;

        Ok(ChannelStats {
            total_videos: totals.total_videos,
            total_views: totals.total_views,
            total_subscribers,
            total_likes,
            likes_given,
        })
    }

    /// All of the actor's videos, unpublished included, newest first.
    pub async fn videos(
        &self,
        actor_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<video::Model>> {
        let filter = VideoFilter {
            owner_id: Some(actor_id.to_string()),
            search: None,
            include_unpublished: true,
        };

        self.video_repo
            .find_page(
                &filter,
                VideoSortKey::CreatedAt,
                SortDirection::Desc,
                request,
            )
            .await
    }
}
