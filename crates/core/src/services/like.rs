//! Like service.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use vidtube_common::{AppError, AppResult, IdGenerator, Page, PageRequest, parse_id};
use vidtube_db::{
    entities::{like, like::LikeTarget, video},
    repositories::{CommentRepository, LikeRepository, TweetRepository, VideoRepository},
};

use crate::services::toggle::{AssociationStore, ToggleOutcome, toggle};

/// A liked video together with when it was liked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub liked_at: chrono::DateTime<chrono::FixedOffset>,
    pub video: video::Model,
}

/// One user's like on one target.
struct LikePair<'a> {
    repo: &'a LikeRepository,
    user_id: &'a str,
    kind: LikeTarget,
    target_id: &'a str,
}

#[async_trait::async_trait]
impl AssociationStore for LikePair<'_> {
    type Record = like::Model;

    async fn insert_if_absent(&self, record: &like::Model) -> AppResult<bool> {
        let model = like::ActiveModel {
            id: Set(record.id.clone()),
            user_id: Set(record.user_id.clone()),
            target_kind: Set(record.target_kind),
            target_id: Set(record.target_id.clone()),
            created_at: Set(record.created_at),
        };
        self.repo.insert_if_absent(model).await
    }

    async fn find(&self) -> AppResult<Option<like::Model>> {
        self.repo
            .find_by_pair(self.user_id, self.kind, self.target_id)
            .await
    }

    async fn delete(&self) -> AppResult<u64> {
        self.repo
            .delete_by_pair(self.user_id, self.kind, self.target_id)
            .await
    }
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    video_repo: VideoRepository,
    tweet_repo: TweetRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        video_repo: VideoRepository,
        tweet_repo: TweetRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            like_repo,
            video_repo,
            tweet_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like the target if the user has not, otherwise remove the like.
    pub async fn toggle(
        &self,
        user_id: &str,
        kind: LikeTarget,
        raw_target_id: &str,
    ) -> AppResult<ToggleOutcome<like::Model>> {
        let target_id = parse_id(raw_target_id, kind.as_str())?;
        self.ensure_visible(user_id, kind, &target_id).await?;

        let store = LikePair {
            repo: &self.like_repo,
            user_id,
            kind,
            target_id: &target_id,
        };
        let candidate = like::Model {
            id: self.id_gen.generate(),
            user_id: user_id.to_string(),
            target_kind: kind,
            target_id: target_id.clone(),
            created_at: Utc::now().into(),
        };

        let outcome = toggle(&store, candidate).await?;
        tracing::debug!(
            user_id = %user_id,
            kind = kind.as_str(),
            target_id = %target_id,
            action = ?outcome.action,
            "Toggled like"
        );
        Ok(outcome)
    }

    /// Videos the user liked, newest like first.
    pub async fn liked_videos(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<LikedVideo>> {
        let page = self.like_repo.find_liked_videos(user_id, request).await?;

        // The join filter already drops likes whose video is gone.
        Ok(page.filter_map(|(like, video)| {
            video.map(|video| LikedVideo {
                liked_at: like.created_at,
                video,
            })
        }))
    }

    /// Likes only land on targets the user can see. Unpublished videos are
    /// hidden from everyone but their owner, along with their comments.
    async fn ensure_visible(
        &self,
        user_id: &str,
        kind: LikeTarget,
        target_id: &str,
    ) -> AppResult<()> {
        let visible = match kind {
            LikeTarget::Video => self.video_visible(user_id, target_id).await?,
            LikeTarget::Tweet => self.tweet_repo.find_by_id(target_id).await?.is_some(),
            LikeTarget::Comment => match self.comment_repo.find_by_id(target_id).await? {
                Some(comment) => match comment.video_id {
                    Some(video_id) => self.video_visible(user_id, &video_id).await?,
                    None => true,
                },
                None => false,
            },
        };
        if visible {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} not found", kind.label())))
        }
    }

    async fn video_visible(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        Ok(self
            .video_repo
            .find_by_id(video_id)
            .await?
            .is_some_and(|v| v.is_published || v.owner_id == user_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::toggle::ToggleAction;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;
    use vidtube_db::entities::comment;

    const ACTOR: &str = "01hzy8b3k6m2n4p5q7r8s9t0va";
    const VIDEO: &str = "01hzy8b3k6m2n4p5q7r8s9t0vb";
    const COMMENT: &str = "01hzy8b3k6m2n4p5q7r8s9t0vd";

    fn service(db: MockDatabase) -> LikeService {
        let conn = Arc::new(db.into_connection());
        LikeService::new(
            LikeRepository::new(conn.clone()),
            VideoRepository::new(conn.clone()),
            TweetRepository::new(conn.clone()),
            CommentRepository::new(conn),
        )
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_video(id: &str) -> video::Model {
        video::Model {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            title: "Clip".to_string(),
            description: "A clip".to_string(),
            video_file_id: "videos/clip.mp4".to_string(),
            video_url: "/media/videos/clip.mp4".to_string(),
            thumbnail_id: None,
            thumbnail_url: None,
            duration: 30.0,
            views: 0,
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_like(user_id: &str, target_id: &str) -> like::Model {
        like::Model {
            id: "01hzy8b3k6m2n4p5q7r8s9t0vc".to_string(),
            user_id: user_id.to_string(),
            target_kind: LikeTarget::Video,
            target_id: target_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_creates_when_absent() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(VIDEO)]])
                .append_exec_results([exec(1)]),
        );

        let outcome = service
            .toggle(ACTOR, LikeTarget::Video, VIDEO)
            .await
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Created);
        assert_eq!(outcome.record.user_id, ACTOR);
        assert_eq!(outcome.record.target_id, VIDEO);
    }

    #[tokio::test]
    async fn test_toggle_deletes_existing_like() {
        let existing = create_test_like(ACTOR, VIDEO);
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(VIDEO)]])
                .append_query_results([[existing.clone()]])
                .append_exec_results([exec(0), exec(1)]),
        );

        let outcome = service
            .toggle(ACTOR, LikeTarget::Video, VIDEO)
            .await
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Deleted);
        assert_eq!(outcome.record, existing);
    }

    #[tokio::test]
    async fn test_toggle_conflict_when_row_vanishes() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(VIDEO)]])
                .append_query_results([[create_test_like(ACTOR, VIDEO)]])
                .append_exec_results([exec(0), exec(0)]),
        );

        let result = service.toggle(ACTOR, LikeTarget::Video, VIDEO).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_toggle_invalid_id() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        match service.toggle(ACTOR, LikeTarget::Tweet, "bogus").await {
            Err(AppError::InvalidArgument(msg)) => assert_eq!(msg, "Invalid tweet id"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_missing_comment() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()]),
        );

        match service.toggle(ACTOR, LikeTarget::Comment, VIDEO).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Comment not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    fn create_test_comment(id: &str, video_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            content: "Nice".to_string(),
            video_id: Some(video_id.to_string()),
            tweet_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_unpublished_video(id: &str, owner_id: &str) -> video::Model {
        video::Model {
            owner_id: owner_id.to_string(),
            is_published: false,
            ..create_test_video(id)
        }
    }

    #[tokio::test]
    async fn test_toggle_unpublished_video_of_other_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_unpublished_video(VIDEO, "owner")]]),
        );

        match service.toggle(ACTOR, LikeTarget::Video, VIDEO).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Video not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_own_unpublished_video() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_unpublished_video(VIDEO, ACTOR)]])
                .append_exec_results([exec(1)]),
        );

        let outcome = service
            .toggle(ACTOR, LikeTarget::Video, VIDEO)
            .await
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Created);
    }

    #[tokio::test]
    async fn test_toggle_comment_under_unpublished_video() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(COMMENT, VIDEO)]])
                .append_query_results([[create_unpublished_video(VIDEO, "owner")]]),
        );

        match service.toggle(ACTOR, LikeTarget::Comment, COMMENT).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Comment not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_comment_under_published_video() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(COMMENT, VIDEO)]])
                .append_query_results([[create_test_video(VIDEO)]])
                .append_exec_results([exec(1)]),
        );

        let outcome = service
            .toggle(ACTOR, LikeTarget::Comment, COMMENT)
            .await
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Created);
        assert_eq!(outcome.record.target_kind, LikeTarget::Comment);
    }

    #[tokio::test]
    async fn test_liked_videos() {
        let like = create_test_like(ACTOR, VIDEO);
        let video = create_test_video(VIDEO);
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(1)),
                }]])
                .append_query_results([[(like.clone(), video.clone())]]),
        );

        let page = service
            .liked_videos(ACTOR, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].video.id, VIDEO);
        assert_eq!(page.items[0].liked_at, like.created_at);
    }
}
