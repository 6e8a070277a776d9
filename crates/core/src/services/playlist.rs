//! Playlist service.

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator, Page, PageRequest, parse_id};
use vidtube_db::{
    entities::{playlist, playlist_video, video},
    repositories::{PlaylistRepository, UserRepository, VideoRepository},
};

use crate::services::ownership::require_owner;
use crate::services::validation::{non_blank, not_blank};

/// Input for creating a playlist.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaylistInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub description: String,
}

/// Input for updating a playlist. Blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlaylistInput {
    #[validate(length(max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// A playlist with its aggregates, as listed on a user's page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: playlist::Model,
    pub total_videos: i64,
    pub total_views: i64,
}

/// A playlist with the videos in it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: playlist::Model,
    pub videos: Vec<video::Model>,
}

/// Playlist service for business logic.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub const fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a playlist.
    pub async fn create(
        &self,
        actor_id: &str,
        input: CreatePlaylistInput,
    ) -> AppResult<playlist::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.playlist_repo.create(model).await
    }

    /// Playlists of a user with video count and total views.
    pub async fn list_by_user(
        &self,
        raw_user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<PlaylistSummary>> {
        let user_id = parse_id(raw_user_id, "user")?;
        if self.user_repo.find_by_id(&user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let page = self.playlist_repo.find_by_owner(&user_id, request).await?;
        let ids: Vec<String> = page.items.iter().map(|p| p.id.clone()).collect();
        let totals = self.playlist_repo.totals_for(&ids).await?;

        Ok(page.map(|playlist| {
            let total = totals.get(&playlist.id).copied().unwrap_or_default();
            PlaylistSummary {
                playlist,
                total_videos: total.total_videos,
                total_views: total.total_views,
            }
        }))
    }

    /// A playlist with its videos. Other users' unpublished videos are left out.
    pub async fn get(&self, actor_id: &str, raw_id: &str) -> AppResult<PlaylistDetail> {
        let id = parse_id(raw_id, "playlist")?;
        let playlist = self
            .playlist_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

        let videos = self
            .playlist_repo
            .find_videos(&id)
            .await?
            .into_iter()
            .filter(|v| v.is_published || v.owner_id == actor_id)
            .collect();

        Ok(PlaylistDetail { playlist, videos })
    }

    /// Rename or re-describe one's own playlist. At least one field is required.
    pub async fn update(
        &self,
        actor_id: &str,
        raw_id: &str,
        input: UpdatePlaylistInput,
    ) -> AppResult<playlist::Model> {
        input.validate()?;
        let id = parse_id(raw_id, "playlist")?;
        let name = non_blank(input.name.as_deref());
        let description = non_blank(input.description.as_deref());

        if name.is_none() && description.is_none() {
            return Err(AppError::InvalidArgument(
                "At least one of name or description is required".to_string(),
            ));
        }

        let playlist = require_owner(self.playlist_repo.find_by_id(&id).await?, actor_id)?;

        let mut model = playlist.into_active_model();
        if let Some(name) = name {
            model.name = Set(name.to_string());
        }
        if let Some(description) = description {
            model.description = Set(description.to_string());
        }
        model.updated_at = Set(Utc::now().into());

        self.playlist_repo.update(model).await
    }

    /// Delete one's own playlist.
    pub async fn delete(&self, actor_id: &str, raw_id: &str) -> AppResult<playlist::Model> {
        let id = parse_id(raw_id, "playlist")?;
        let playlist = require_owner(self.playlist_repo.find_by_id(&id).await?, actor_id)?;

        self.playlist_repo.delete(&id).await?;
        Ok(playlist)
    }

    /// Add a video to one's own playlist.
    pub async fn add_video(
        &self,
        actor_id: &str,
        raw_video_id: &str,
        raw_playlist_id: &str,
    ) -> AppResult<PlaylistDetail> {
        let video_id = parse_id(raw_video_id, "video")?;
        let playlist_id = parse_id(raw_playlist_id, "playlist")?;

        require_owner(
            self.playlist_repo.find_by_id(&playlist_id).await?,
            actor_id,
        )?;

        let visible = self
            .video_repo
            .find_by_id(&video_id)
            .await?
            .is_some_and(|v| v.is_published || v.owner_id == actor_id);
        if !visible {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let entry = playlist_video::ActiveModel {
            id: Set(self.id_gen.generate()),
            playlist_id: Set(playlist_id.clone()),
            video_id: Set(video_id),
            created_at: Set(Utc::now().into()),
        };
        if !self.playlist_repo.add_video(entry).await? {
            return Err(AppError::Conflict(
                "Video is already in the playlist".to_string(),
            ));
        }

        self.get(actor_id, &playlist_id).await
    }

    /// Remove a video from one's own playlist.
    pub async fn remove_video(
        &self,
        actor_id: &str,
        raw_video_id: &str,
        raw_playlist_id: &str,
    ) -> AppResult<PlaylistDetail> {
        let video_id = parse_id(raw_video_id, "video")?;
        let playlist_id = parse_id(raw_playlist_id, "playlist")?;

        require_owner(
            self.playlist_repo.find_by_id(&playlist_id).await?,
            actor_id,
        )?;

        if self
            .playlist_repo
            .remove_video(&playlist_id, &video_id)
            .await?
            == 0
        {
            return Err(AppError::NotFound(
                "Video is not in the playlist".to_string(),
            ));
        }

        self.get(actor_id, &playlist_id).await
    }
}
