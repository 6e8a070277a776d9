//! Playlist repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Playlist, PlaylistVideo, Video, playlist, playlist_video, video};
use crate::paging::{fetch_page, order_with_tiebreak};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, OnConflict},
};
use vidtube_common::{AppError, AppResult, Page, PageRequest, SortDirection};

/// Aggregates shown next to each playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaylistTotals {
    pub total_videos: i64,
    pub total_views: i64,
}

/// Playlist repository for database operations.
#[derive(Clone)]
pub struct PlaylistRepository {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepository {
    /// Create a new playlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<playlist::Model>> {
        Playlist::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new playlist.
    pub async fn create(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a playlist.
    pub async fn update(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a playlist and its entries.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Playlist::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Playlists of a user, newest first.
    pub async fn find_by_owner(
        &self,
        owner_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<playlist::Model>> {
        let query = order_with_tiebreak(
            Playlist::find().filter(playlist::Column::OwnerId.eq(owner_id)),
            playlist::Column::CreatedAt,
            playlist::Column::Id,
            SortDirection::Desc,
        );

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Video count and summed views for each of the given playlists.
    ///
    /// Playlists without entries are absent from the map.
    pub async fn totals_for(
        &self,
        playlist_ids: &[String],
    ) -> AppResult<HashMap<String, PlaylistTotals>> {
        #[derive(FromQueryResult)]
        struct TotalsRow {
            playlist_id: String,
            total_videos: i64,
            total_views: i64,
        }

        if playlist_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = PlaylistVideo::find()
            .select_only()
            .column(playlist_video::Column::PlaylistId)
            .column_as(playlist_video::Column::VideoId.count(), "total_videos")
            .column_as(
                Expr::cust(r#"COALESCE(SUM("video"."views"), 0)::bigint"#),
                "total_views",
            )
            .join(JoinType::InnerJoin, playlist_video::Relation::Video.def())
            .filter(playlist_video::Column::PlaylistId.is_in(playlist_ids.iter().cloned()))
            .group_by(playlist_video::Column::PlaylistId)
            .into_model::<TotalsRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.playlist_id,
                    PlaylistTotals {
                        total_videos: row.total_videos,
                        total_views: row.total_views,
                    },
                )
            })
            .collect())
    }

    /// Videos in a playlist, in the order they were added.
    pub async fn find_videos(&self, playlist_id: &str) -> AppResult<Vec<video::Model>> {
        let rows = PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .find_also_related(Video)
            .order_by_asc(playlist_video::Column::CreatedAt)
            .order_by_asc(playlist_video::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().filter_map(|(_, video)| video).collect())
    }

    /// Add a video to a playlist. Returns `false` if it was already there.
    pub async fn add_video(&self, model: playlist_video::ActiveModel) -> AppResult<bool> {
        let inserted = PlaylistVideo::insert(model)
            .on_conflict(
                OnConflict::columns([
                    playlist_video::Column::PlaylistId,
                    playlist_video::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Remove a video from a playlist. Returns rows removed.
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> AppResult<u64> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
