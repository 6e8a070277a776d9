//! Comment service.

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator, Page, PageRequest, parse_id};
use vidtube_db::{
    entities::{comment, like::LikeTarget},
    repositories::{
        CommentParent, CommentRepository, LikeRepository, TweetRepository, VideoRepository,
    },
};

use crate::services::ownership::require_owner;
use crate::services::user::PublicProfile;
use crate::services::validation::not_blank;

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Video,
    Tweet,
}

impl CommentTarget {
    const fn name(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Tweet => "tweet",
        }
    }

    fn parent(self, id: &str) -> CommentParent<'_> {
        match self {
            Self::Video => CommentParent::Video(id),
            Self::Tweet => CommentParent::Tweet(id),
        }
    }
}

/// Input for adding or editing a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// A comment with its author's public profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: comment::Model,
    pub owner: Option<PublicProfile>,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    tweet_repo: TweetRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
        tweet_repo: TweetRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            tweet_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comments on a video or tweet, newest first, with author profiles.
    pub async fn list(
        &self,
        actor_id: &str,
        target: CommentTarget,
        raw_target_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<CommentView>> {
        let target_id = parse_id(raw_target_id, target.name())?;
        self.ensure_visible(actor_id, target, &target_id).await?;

        let page = self
            .comment_repo
            .find_by_parent(target.parent(&target_id), request)
            .await?;

        Ok(page.map(|(comment, owner)| CommentView {
            comment,
            owner: owner.map(PublicProfile::from),
        }))
    }

    /// Add a comment to a video or tweet.
    pub async fn add(
        &self,
        actor_id: &str,
        target: CommentTarget,
        raw_target_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;
        let target_id = parse_id(raw_target_id, target.name())?;
        self.ensure_visible(actor_id, target, &target_id).await?;

        let (video_id, tweet_id) = match target {
            CommentTarget::Video => (Some(target_id), None),
            CommentTarget::Tweet => (None, Some(target_id)),
        };

        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            content: Set(input.content.trim().to_string()),
            video_id: Set(video_id),
            tweet_id: Set(tweet_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.comment_repo.create(model).await
    }

    /// Replace the content of one's own comment.
    pub async fn update(
        &self,
        actor_id: &str,
        raw_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;
        let id = parse_id(raw_id, "comment")?;
        let comment = require_owner(self.comment_repo.find_by_id(&id).await?, actor_id)?;

        let mut model = comment.into_active_model();
        model.content = Set(input.content.trim().to_string());
        model.updated_at = Set(Utc::now().into());

        self.comment_repo.update(model).await
    }

    /// Delete one's own comment and the likes on it.
    pub async fn delete(&self, actor_id: &str, raw_id: &str) -> AppResult<comment::Model> {
        let id = parse_id(raw_id, "comment")?;
        let comment = require_owner(self.comment_repo.find_by_id(&id).await?, actor_id)?;

        self.comment_repo.delete(&id).await?;
        self.like_repo
            .delete_for_targets(LikeTarget::Comment, std::slice::from_ref(&id))
            .await?;

        Ok(comment)
    }

    async fn ensure_visible(
        &self,
        actor_id: &str,
        target: CommentTarget,
        target_id: &str,
    ) -> AppResult<()> {
        let visible = match target {
            CommentTarget::Video => self
                .video_repo
                .find_by_id(target_id)
                .await?
                .is_some_and(|v| v.is_published || v.owner_id == actor_id),
            CommentTarget::Tweet => self.tweet_repo.find_by_id(target_id).await?.is_some(),
        };

        if visible {
            Ok(())
        } else {
            Err(AppError::NotFound(match target {
                CommentTarget::Video => "Video not found".to_string(),
                CommentTarget::Tweet => "Tweet not found".to_string(),
            }))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;
    use vidtube_db::entities::{tweet, user, video};

    const ALICE: &str = "01hzy8b3k6m2n4p5q7r8s9t0va";
    const BOB: &str = "01hzy8b3k6m2n4p5q7r8s9t0vb";
    const VIDEO: &str = "01hzy8b3k6m2n4p5q7r8s9t0vc";
    const COMMENT: &str = "01hzy8b3k6m2n4p5q7r8s9t0vd";

    fn service(db: MockDatabase) -> CommentService {
        let conn = Arc::new(db.into_connection());
        CommentService::new(
            CommentRepository::new(conn.clone()),
            VideoRepository::new(conn.clone()),
            TweetRepository::new(conn.clone()),
            LikeRepository::new(conn),
        )
    }

    fn create_test_video(published: bool) -> video::Model {
        video::Model {
            id: VIDEO.to_string(),
            owner_id: BOB.to_string(),
            title: "Clip".to_string(),
            description: "A clip".to_string(),
            video_file_id: "videos/clip.mp4".to_string(),
            video_url: "/media/videos/clip.mp4".to_string(),
            thumbnail_id: None,
            thumbnail_url: None,
            duration: 3.0,
            views: 0,
            is_published: published,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_comment(id: &str, owner_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            content: "Nice one".to_string(),
            video_id: Some(VIDEO.to_string()),
            tweet_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
            avatar_url: "https://cdn.test/alice.png".to_string(),
            cover_image_url: None,
            token: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn input(content: &str) -> CommentInput {
        CommentInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_rejects_empty_content() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .add(ALICE, CommentTarget::Video, VIDEO, input(""))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_add_to_video() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([[create_test_comment(COMMENT, ALICE)]]),
        );

        let comment = service
            .add(ALICE, CommentTarget::Video, VIDEO, input("Nice one"))
            .await
            .unwrap();

        assert_eq!(comment.owner_id, ALICE);
        assert_eq!(comment.video_id.as_deref(), Some(VIDEO));
    }

    #[tokio::test]
    async fn test_add_to_unpublished_video_of_other_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(false)]]),
        );

        let result = service
            .add(ALICE, CommentTarget::Video, VIDEO, input("Hi"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_to_missing_tweet() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tweet::Model>::new()]),
        );

        match service
            .add(ALICE, CommentTarget::Tweet, VIDEO, input("Hi"))
            .await
        {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Tweet not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_pages_through_five_comments() {
        let rows = [
            (create_test_comment("c5", ALICE), create_test_user(ALICE)),
            (create_test_comment("c4", ALICE), create_test_user(ALICE)),
        ];
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(5)),
                }]])
                .append_query_results([rows]),
        );

        let page = service
            .list(
                ALICE,
                CommentTarget::Video,
                VIDEO,
                PageRequest::new(1, 2).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert_eq!(
            page.items[0].owner.as_ref().map(|o| o.username.as_str()),
            Some("alice")
        );
    }

    #[test]
    fn test_comment_view_flattens_comment() {
        let view = CommentView {
            comment: create_test_comment(COMMENT, ALICE),
            owner: Some(create_test_user(ALICE).into()),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], COMMENT);
        assert_eq!(json["ownerId"], ALICE);
        assert_eq!(json["owner"]["fullName"], "Alice");
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(COMMENT, BOB)]]),
        );

        let result = service.update(ALICE, COMMENT, input("Edited")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_comment_likes() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(COMMENT, ALICE)]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3,
                    },
                ]),
        );

        let deleted = service.delete(ALICE, COMMENT).await.unwrap();
        assert_eq!(deleted.id, COMMENT);
    }
}
