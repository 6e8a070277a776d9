//! Video repository.

use std::sync::Arc;

use crate::entities::{Video, video};
use crate::paging::{fetch_page, order_with_tiebreak};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect,
    sea_query::{Expr, Func, LikeExpr},
};
use vidtube_common::{AppError, AppResult, Page, PageRequest, SortDirection};

/// Column a video listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortKey {
    /// Parse the `sortBy` query value. Accepts camelCase and `snake_case`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            "views" => Some(Self::Views),
            "duration" => Some(Self::Duration),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    const fn column(self) -> video::Column {
        match self {
            Self::CreatedAt => video::Column::CreatedAt,
            Self::UpdatedAt => video::Column::UpdatedAt,
            Self::Views => video::Column::Views,
            Self::Duration => video::Column::Duration,
            Self::Title => video::Column::Title,
        }
    }
}

/// Filters applied to a video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    /// Only videos of this owner.
    pub owner_id: Option<String>,
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
    /// Include unpublished videos. Callers only set this for the owner.
    pub include_unpublished: bool,
}

/// Video totals for one owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromQueryResult)]
pub struct VideoTotals {
    pub total_videos: i64,
    pub total_views: i64,
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a video. Comments and playlist entries go with it.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Video::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// List videos matching `filter`, sorted by `sort` with the ID as tie-breaker.
    pub async fn find_page(
        &self,
        filter: &VideoFilter,
        sort: VideoSortKey,
        direction: SortDirection,
        request: PageRequest,
    ) -> AppResult<Page<video::Model>> {
        let mut query = Video::find();

        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(video::Column::OwnerId.eq(owner_id.as_str()));
        }

        if !filter.include_unpublished {
            query = query.filter(video::Column::IsPublished.eq(true));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((Video, video::Column::Title))))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((Video, video::Column::Description))))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        let query = order_with_tiebreak(query, sort.column(), video::Column::Id, direction);

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Number of videos and summed views for an owner.
    pub async fn totals_for_owner(&self, owner_id: &str) -> AppResult<VideoTotals> {
        let totals = Video::find()
            .select_only()
            .column_as(video::Column::Id.count(), "total_videos")
            .column_as(
                Expr::cust(r#"COALESCE(SUM("video"."views"), 0)::bigint"#),
                "total_views",
            )
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_model::<VideoTotals>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(totals.unwrap_or_default())
    }
}
