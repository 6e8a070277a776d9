//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, Video, like, like::LikeTarget, video};
use crate::paging::fetch_page;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{OnConflict, Query},
};
use serde::Serialize;
use vidtube_common::{AppError, AppResult, Page, PageRequest};

/// Like counts grouped by target kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LikesByKind {
    pub videos: u64,
    pub tweets: u64,
    pub comments: u64,
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a like unless one already exists for the same (user, target).
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_if_absent(&self, model: like::ActiveModel) -> AppResult<bool> {
        let inserted = Like::insert(model)
            .on_conflict(
                OnConflict::columns([
                    like::Column::UserId,
                    like::Column::TargetKind,
                    like::Column::TargetId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Find the like a user placed on a target.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        kind: LikeTarget,
        target_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::TargetKind.eq(kind))
            .filter(like::Column::TargetId.eq(target_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the like a user placed on a target. Returns rows removed.
    pub async fn delete_by_pair(
        &self,
        user_id: &str,
        kind: LikeTarget,
        target_id: &str,
    ) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::TargetKind.eq(kind))
            .filter(like::Column::TargetId.eq(target_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Remove every like pointing at the given targets.
    pub async fn delete_for_targets(&self, kind: LikeTarget, target_ids: &[String]) -> AppResult<u64> {
        if target_ids.is_empty() {
            return Ok(0);
        }
        let result = Like::delete_many()
            .filter(like::Column::TargetKind.eq(kind))
            .filter(like::Column::TargetId.is_in(target_ids.iter().cloned()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Videos a user liked, newest like first.
    ///
    /// Unpublished videos are only listed when the user owns them.
    pub async fn find_liked_videos(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<(like::Model, Option<video::Model>)>> {
        let query = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::TargetKind.eq(LikeTarget::Video))
            .find_also_related(Video)
            .filter(
                Condition::any()
                    .add(video::Column::IsPublished.eq(true))
                    .add(video::Column::OwnerId.eq(user_id)),
            )
            .order_by_desc(like::Column::CreatedAt)
            .order_by_desc(like::Column::Id);

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Likes received on videos owned by `owner_id`.
    pub async fn count_received_on_videos(&self, owner_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::TargetKind.eq(LikeTarget::Video))
            .filter(
                like::Column::TargetId.in_subquery(
                    Query::select()
                        .column(video::Column::Id)
                        .from(Video)
                        .and_where(video::Column::OwnerId.eq(owner_id))
                        .to_owned(),
                ),
            )
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Likes a user has given, grouped by target kind.
    pub async fn count_given_by_kind(&self, user_id: &str) -> AppResult<LikesByKind> {
        #[derive(FromQueryResult)]
        struct KindCount {
            target_kind: LikeTarget,
            total: i64,
        }

        let rows = Like::find()
            .select_only()
            .column(like::Column::TargetKind)
            .column_as(like::Column::Id.count(), "total")
            .filter(like::Column::UserId.eq(user_id))
            .group_by(like::Column::TargetKind)
            .into_model::<KindCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut counts = LikesByKind::default();
        for row in rows {
            let total = row.total.max(0) as u64;
            match row.target_kind {
                LikeTarget::Video => counts.videos = total,
                LikeTarget::Tweet => counts.tweets = total,
                LikeTarget::Comment => counts.comments = total,
            }
        }
        Ok(counts)
    }
}
