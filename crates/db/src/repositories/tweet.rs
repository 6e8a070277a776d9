//! Tweet repository.

use std::sync::Arc;

use crate::entities::{Tweet, tweet};
use crate::paging::{fetch_page, order_with_tiebreak};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use vidtube_common::{AppError, AppResult, Page, PageRequest, SortDirection};

/// Tweet repository for database operations.
#[derive(Clone)]
pub struct TweetRepository {
    db: Arc<DatabaseConnection>,
}

impl TweetRepository {
    /// Create a new tweet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tweet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tweet::Model>> {
        Tweet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tweet.
    pub async fn create(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tweet.
    pub async fn update(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tweet. Its comments go with it.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Tweet::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Tweets of a user, newest first.
    pub async fn find_by_owner(
        &self,
        owner_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<tweet::Model>> {
        let query = order_with_tiebreak(
            Tweet::find().filter(tweet::Column::OwnerId.eq(owner_id)),
            tweet::Column::CreatedAt,
            tweet::Column::Id,
            SortDirection::Desc,
        );

        fetch_page(self.db.as_ref(), query, request).await
    }
}
