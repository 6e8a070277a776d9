//! Subscription repository.

use std::sync::Arc;

use crate::entities::{
    Subscription,
    subscription::{self, ChannelLink, SubscriberLink},
    user,
};
use crate::paging::fetch_page;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use vidtube_common::{AppError, AppResult, Page, PageRequest};

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a subscription unless the pair already exists.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_if_absent(&self, model: subscription::ActiveModel) -> AppResult<bool> {
        let inserted = Subscription::insert(model)
            .on_conflict(
                OnConflict::columns([
                    subscription::Column::SubscriberId,
                    subscription::Column::ChannelId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Find a subscription by subscriber and channel.
    pub async fn find_by_pair(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a subscription by pair. Returns rows removed.
    pub async fn delete_by_pair(&self, subscriber_id: &str, channel_id: &str) -> AppResult<u64> {
        let result = Subscription::delete_many()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Users subscribed to a channel, newest first.
    pub async fn find_subscribers(
        &self,
        channel_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<(subscription::Model, Option<user::Model>)>> {
        let query = Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .find_also_linked(SubscriberLink)
            .order_by_desc(subscription::Column::CreatedAt)
            .order_by_desc(subscription::Column::Id);

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Channels a user subscribes to, newest first.
    pub async fn find_channels(
        &self,
        subscriber_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<(subscription::Model, Option<user::Model>)>> {
        let query = Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .find_also_linked(ChannelLink)
            .order_by_desc(subscription::Column::CreatedAt)
            .order_by_desc(subscription::Column::Id);

        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Count subscribers of a channel.
    pub async fn count_subscribers(&self, channel_id: &str) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
