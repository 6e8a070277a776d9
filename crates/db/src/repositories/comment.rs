//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, User, comment, user};
use crate::paging::{fetch_page, order_with_tiebreak};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
};
use vidtube_common::{AppError, AppResult, Page, PageRequest, SortDirection};

/// Which record a comment listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent<'a> {
    Video(&'a str),
    Tweet(&'a str),
}

impl<'a> CommentParent<'a> {
    const fn column(self) -> comment::Column {
        match self {
            Self::Video(_) => comment::Column::VideoId,
            Self::Tweet(_) => comment::Column::TweetId,
        }
    }

    const fn id(self) -> &'a str {
        match self {
            Self::Video(id) | Self::Tweet(id) => id,
        }
    }
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Comments on a video or tweet with their authors, newest first.
    pub async fn find_by_parent(
        &self,
        parent: CommentParent<'_>,
        request: PageRequest,
    ) -> AppResult<Page<(comment::Model, Option<user::Model>)>> {
        let query = order_with_tiebreak(
            Comment::find()
                .filter(parent.column().eq(parent.id()))
                .find_also_related(User),
            comment::Column::CreatedAt,
            comment::Column::Id,
            SortDirection::Desc,
        );

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// IDs of every comment on a video or tweet.
    pub async fn ids_by_parent(&self, parent: CommentParent<'_>) -> AppResult<Vec<String>> {
        Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(parent.column().eq(parent.id()))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
