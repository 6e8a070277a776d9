//! Video service.

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{
    AppError, AppResult, IdGenerator, MediaStoreHandle, Page, PageRequest, SortDirection,
    UploadedMedia, media_key, parse_id,
};
use vidtube_db::{
    entities::{like::LikeTarget, video},
    repositories::{
        CommentParent, CommentRepository, LikeRepository, UserRepository, VideoFilter,
        VideoRepository, VideoSortKey,
    },
};

use crate::services::ownership::require_owner;
use crate::services::validation::{non_blank, not_blank};

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Input for publishing a video.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishVideoInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[validate(range(min = 0.0))]
    pub duration: Option<f64>,
}

const fn default_true() -> bool {
    true
}

/// Input for updating a video. Blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Raw listing parameters besides the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub user_id: Option<String>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
}

/// Video service for business logic.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    media: MediaStoreHandle,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        media: MediaStoreHandle,
    ) -> Self {
        Self {
            video_repo,
            user_repo,
            like_repo,
            comment_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// List videos.
    ///
    /// Unpublished videos only appear when the actor lists their own.
    pub async fn list(
        &self,
        actor_id: &str,
        query: &VideoListQuery,
        request: PageRequest,
    ) -> AppResult<Page<video::Model>> {
        let owner_id = match non_blank(query.user_id.as_deref()) {
            Some(raw) => {
                let id = parse_id(raw, "user")?;
                if self.user_repo.find_by_id(&id).await?.is_none() {
                    return Err(AppError::NotFound("User not found".to_string()));
                }
                Some(id)
            }
            None => None,
        };

        let sort = match non_blank(query.sort_by.as_deref()) {
            Some(raw) => VideoSortKey::parse(raw)
                .ok_or_else(|| AppError::InvalidArgument(format!("Invalid sortBy: {raw}")))?,
            None => VideoSortKey::default(),
        };
        let direction = SortDirection::parse(query.sort_type.as_deref())?;

        let filter = VideoFilter {
            include_unpublished: owner_id.as_deref() == Some(actor_id),
            owner_id,
            search: non_blank(query.query.as_deref()).map(str::to_string),
        };

        self.video_repo
            .find_page(&filter, sort, direction, request)
            .await
    }

    /// Upload a video (and optional thumbnail) and record it.
    pub async fn publish(
        &self,
        actor_id: &str,
        input: PublishVideoInput,
        file: Option<MediaUpload>,
        thumbnail: Option<MediaUpload>,
    ) -> AppResult<video::Model> {
        input.validate()?;

        let file = file
            .filter(|f| !f.data.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("Video file is required".to_string()))?;

        let stored_video = self.store("videos", &file).await?;
        let stored_thumbnail = match thumbnail.filter(|t| !t.data.is_empty()) {
            Some(thumbnail) => match self.store("thumbnails", &thumbnail).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    self.discard_media(&stored_video.public_id).await;
                    return Err(e);
                }
            },
            None => None,
        };

        let now = Utc::now();
        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            video_file_id: Set(stored_video.public_id.clone()),
            video_url: Set(stored_video.url.clone()),
            thumbnail_id: Set(stored_thumbnail.as_ref().map(|t| t.public_id.clone())),
            thumbnail_url: Set(stored_thumbnail.as_ref().map(|t| t.url.clone())),
            duration: Set(input.duration.unwrap_or(0.0)),
            views: Set(0),
            is_published: Set(input.is_published),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        match self.video_repo.create(model).await {
            Ok(video) => {
                tracing::info!(video_id = %video.id, owner_id = %actor_id, "Published video");
                Ok(video)
            }
            Err(e) => {
                self.discard_media(&stored_video.public_id).await;
                if let Some(thumbnail) = &stored_thumbnail {
                    self.discard_media(&thumbnail.public_id).await;
                }
                Err(e)
            }
        }
    }

    /// Get a video. Unpublished videos are hidden from everyone but the owner.
    pub async fn get(&self, actor_id: &str, raw_id: &str) -> AppResult<video::Model> {
        let id = parse_id(raw_id, "video")?;
        self.video_repo
            .find_by_id(&id)
            .await?
            .filter(|v| v.is_published || v.owner_id == actor_id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Update title, description or thumbnail. At least one must be given.
    pub async fn update(
        &self,
        actor_id: &str,
        raw_id: &str,
        input: UpdateVideoInput,
        thumbnail: Option<MediaUpload>,
    ) -> AppResult<video::Model> {
        let id = parse_id(raw_id, "video")?;
        let title = non_blank(input.title.as_deref());
        let description = non_blank(input.description.as_deref());
        let thumbnail = thumbnail.filter(|t| !t.data.is_empty());

        if title.is_none() && description.is_none() && thumbnail.is_none() {
            return Err(AppError::InvalidArgument(
                "At least one of title, description or thumbnail is required".to_string(),
            ));
        }

        let video = require_owner(self.video_repo.find_by_id(&id).await?, actor_id)?;
        let old_thumbnail = video.thumbnail_id.clone();

        let stored = match &thumbnail {
            Some(thumbnail) => Some(self.store("thumbnails", thumbnail).await?),
            None => None,
        };

        let mut model = video.into_active_model();
        if let Some(title) = title {
            model.title = Set(title.to_string());
        }
        if let Some(description) = description {
            model.description = Set(description.to_string());
        }
        if let Some(stored) = &stored {
            model.thumbnail_id = Set(Some(stored.public_id.clone()));
            model.thumbnail_url = Set(Some(stored.url.clone()));
        }
        model.updated_at = Set(Utc::now().into());

        let updated = match self.video_repo.update(model).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(stored) = &stored {
                    self.discard_media(&stored.public_id).await;
                }
                return Err(e);
            }
        };

        if stored.is_some() {
            if let Some(old) = old_thumbnail {
                self.discard_media(&old).await;
            }
        }

        Ok(updated)
    }

    /// Delete a video with its comments, likes and stored media.
    pub async fn delete(&self, actor_id: &str, raw_id: &str) -> AppResult<video::Model> {
        let id = parse_id(raw_id, "video")?;
        let video = require_owner(self.video_repo.find_by_id(&id).await?, actor_id)?;

        // Comments cascade with the video, so their likes go before the row does.
        let comment_ids = self
            .comment_repo
            .ids_by_parent(CommentParent::Video(&id))
            .await?;
        self.like_repo
            .delete_for_targets(LikeTarget::Video, std::slice::from_ref(&id))
            .await?;
        self.like_repo
            .delete_for_targets(LikeTarget::Comment, &comment_ids)
            .await?;

        self.video_repo.delete(&id).await?;

        self.discard_media(&video.video_file_id).await;
        if let Some(thumbnail_id) = &video.thumbnail_id {
            self.discard_media(thumbnail_id).await;
        }

        tracing::info!(video_id = %id, owner_id = %actor_id, "Deleted video");
        Ok(video)
    }

    /// Flip whether the video is published.
    pub async fn toggle_publish(&self, actor_id: &str, raw_id: &str) -> AppResult<video::Model> {
        let id = parse_id(raw_id, "video")?;
        let video = require_owner(self.video_repo.find_by_id(&id).await?, actor_id)?;

        let published = !video.is_published;
        let mut model = video.into_active_model();
        model.is_published = Set(published);
        model.updated_at = Set(Utc::now().into());

        self.video_repo.update(model).await
    }

    async fn store(&self, folder: &str, upload: &MediaUpload) -> AppResult<UploadedMedia> {
        let key = media_key(
            folder,
            &self.id_gen.generate_media_key(),
            upload.filename.as_deref(),
        );
        self.media
            .upload(&key, &upload.data, &upload.content_type)
            .await
    }

    async fn discard_media(&self, public_id: &str) {
        if let Err(e) = self.media.delete(public_id).await {
            tracing::warn!(public_id = %public_id, error = %e, "Failed to delete media object");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use vidtube_common::NoOpMediaStore;

    const OWNER: &str = "01hzy8b3k6m2n4p5q7r8s9t0va";
    const STRANGER: &str = "01hzy8b3k6m2n4p5q7r8s9t0vb";
    const VIDEO: &str = "01hzy8b3k6m2n4p5q7r8s9t0vc";
    const COMMENT: &str = "01hzy8b3k6m2n4p5q7r8s9t0vd";

    fn service(db: MockDatabase) -> VideoService {
        let conn = Arc::new(db.into_connection());
        VideoService::new(
            VideoRepository::new(conn.clone()),
            UserRepository::new(conn.clone()),
            LikeRepository::new(conn.clone()),
            CommentRepository::new(conn),
            Arc::new(NoOpMediaStore),
        )
    }

    fn create_test_video(published: bool) -> video::Model {
        video::Model {
            id: VIDEO.to_string(),
            owner_id: OWNER.to_string(),
            title: "Clip".to_string(),
            description: "A clip".to_string(),
            video_file_id: "videos/clip.mp4".to_string(),
            video_url: "/media/videos/clip.mp4".to_string(),
            thumbnail_id: Some("thumbnails/clip.png".to_string()),
            thumbnail_url: Some("/media/thumbnails/clip.png".to_string()),
            duration: 12.5,
            views: 3,
            is_published: published,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn upload(name: &str) -> MediaUpload {
        MediaUpload {
            filename: Some(name.to_string()),
            content_type: "application/octet-stream".to_string(),
            data: b"bytes".to_vec(),
        }
    }

    fn publish_input(title: &str) -> PublishVideoInput {
        PublishVideoInput {
            title: title.to_string(),
            description: "About the clip".to_string(),
            is_published: true,
            duration: Some(12.5),
        }
    }

    #[tokio::test]
    async fn test_publish_stores_media_and_row() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]]),
        );

        let video = service
            .publish(OWNER, publish_input("Clip"), Some(upload("clip.mp4")), None)
            .await
            .unwrap();

        assert_eq!(video.id, VIDEO);
    }

    #[tokio::test]
    async fn test_publish_rejects_blank_title() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .publish(OWNER, publish_input("   "), Some(upload("clip.mp4")), None)
            .await;

        match result {
            Err(AppError::Validation(errors)) => assert!(errors[0].contains("title")),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_requires_file() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.publish(OWNER, publish_input("Clip"), None, None).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_get_hides_unpublished_from_others() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(false)]])
                .append_query_results([[create_test_video(false)]]),
        );

        let result = service.get(STRANGER, VIDEO).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let video = service.get(OWNER, VIDEO).await.unwrap();
        assert!(!video.is_published);
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let input = UpdateVideoInput {
            title: Some("  ".to_string()),
            description: None,
        };
        let result = service.update(OWNER, VIDEO, input, None).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]]),
        );

        let input = UpdateVideoInput {
            title: Some("New title".to_string()),
            description: None,
        };
        let result = service.update(STRANGER, VIDEO, input, None).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_thumbnail() {
        let mut updated = create_test_video(true);
        updated.thumbnail_id = Some("thumbnails/new.png".to_string());

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([[updated.clone()]]),
        );

        let video = service
            .update(OWNER, VIDEO, UpdateVideoInput::default(), Some(upload("new.png")))
            .await
            .unwrap();

        assert_eq!(video.thumbnail_id, updated.thumbnail_id);
    }

    #[tokio::test]
    async fn test_delete_missing_video() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()]),
        );

        let result = service.delete(STRANGER, VIDEO).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_video_and_likes() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ]),
        );

        let video = service.delete(OWNER, VIDEO).await.unwrap();
        assert_eq!(video.id, VIDEO);
    }

    #[tokio::test]
    async fn test_delete_keeps_video_when_comment_like_cleanup_fails() {
        let conn = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([[maplit::btreemap! {
                    "id" => Value::String(Some(Box::new(COMMENT.to_string()))),
                }]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_exec_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );
        let service = VideoService::new(
            VideoRepository::new(conn.clone()),
            UserRepository::new(conn.clone()),
            LikeRepository::new(conn.clone()),
            CommentRepository::new(conn.clone()),
            Arc::new(NoOpMediaStore),
        );

        let result = service.delete(OWNER, VIDEO).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        drop(service);
        let conn = Arc::try_unwrap(conn).unwrap_or_else(|_| panic!("connection still shared"));
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains(r#"DELETE FROM \"like\""#));
        assert!(!log.contains(r#"DELETE FROM \"video\""#));
    }

    #[tokio::test]
    async fn test_toggle_publish_flips_flag() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(true)]])
                .append_query_results([[create_test_video(false)]]),
        );

        let video = service.toggle_publish(OWNER, VIDEO).await.unwrap();
        assert!(!video.is_published);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_key() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let query = VideoListQuery {
            sort_by: Some("popularity".to_string()),
            ..Default::default()
        };
        let result = service.list(OWNER, &query, PageRequest::default()).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_list_all_published() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(1)),
                }]])
                .append_query_results([[create_test_video(true)]]),
        );

        let page = service
            .list(STRANGER, &VideoListQuery::default(), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items.len(), 1);
    }
}
