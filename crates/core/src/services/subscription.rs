//! Subscription service.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::Set;
use serde::Serialize;
use vidtube_common::{AppError, AppResult, IdGenerator, Page, PageRequest, parse_id};
use vidtube_db::{
    entities::{subscription, user},
    repositories::{SubscriptionRepository, UserRepository},
};

use crate::services::toggle::{AssociationStore, ToggleOutcome, toggle};
use crate::services::user::PublicProfile;

/// A subscriber of a channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberEntry {
    pub subscribed_at: DateTime<FixedOffset>,
    pub subscriber: PublicProfile,
}

/// A channel a user subscribes to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntry {
    pub subscribed_at: DateTime<FixedOffset>,
    pub channel: PublicProfile,
}

struct SubscriptionPair<'a> {
    repo: &'a SubscriptionRepository,
    subscriber_id: &'a str,
    channel_id: &'a str,
}

#[async_trait::async_trait]
impl AssociationStore for SubscriptionPair<'_> {
    type Record = subscription::Model;

    async fn insert_if_absent(&self, record: &subscription::Model) -> AppResult<bool> {
        let model = subscription::ActiveModel {
            id: Set(record.id.clone()),
            subscriber_id: Set(record.subscriber_id.clone()),
            channel_id: Set(record.channel_id.clone()),
            created_at: Set(record.created_at),
        };
        self.repo.insert_if_absent(model).await
    }

    async fn find(&self) -> AppResult<Option<subscription::Model>> {
        self.repo
            .find_by_pair(self.subscriber_id, self.channel_id)
            .await
    }

    async fn delete(&self) -> AppResult<u64> {
        self.repo
            .delete_by_pair(self.subscriber_id, self.channel_id)
            .await
    }
}

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(subscription_repo: SubscriptionRepository, user_repo: UserRepository) -> Self {
        Self {
            subscription_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Subscribe to the channel, or unsubscribe if already subscribed.
    pub async fn toggle(
        &self,
        subscriber_id: &str,
        raw_channel_id: &str,
    ) -> AppResult<ToggleOutcome<subscription::Model>> {
        let channel_id = parse_id(raw_channel_id, "channel")?;
        self.require_user(&channel_id, "Channel not found").await?;

        if channel_id == subscriber_id {
            return Err(AppError::InvalidArgument(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        let store = SubscriptionPair {
            repo: &self.subscription_repo,
            subscriber_id,
            channel_id: &channel_id,
        };
        let candidate = subscription::Model {
            id: self.id_gen.generate(),
            subscriber_id: subscriber_id.to_string(),
            channel_id: channel_id.clone(),
            created_at: Utc::now().into(),
        };

        let outcome = toggle(&store, candidate).await?;
        tracing::debug!(
            subscriber_id = %subscriber_id,
            channel_id = %channel_id,
            action = ?outcome.action,
            "Toggled subscription"
        );
        Ok(outcome)
    }

    /// Users subscribed to a channel, newest subscription first.
    pub async fn subscribers(
        &self,
        raw_channel_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<SubscriberEntry>> {
        let channel_id = parse_id(raw_channel_id, "channel")?;
        self.require_user(&channel_id, "Channel not found").await?;

        let page = self
            .subscription_repo
            .find_subscribers(&channel_id, request)
            .await?;

        Ok(page.filter_map(|(sub, user)| {
            user.map(|user| SubscriberEntry {
                subscribed_at: sub.created_at,
                subscriber: user.into(),
            })
        }))
    }

    /// Channels a user subscribes to, newest subscription first.
    pub async fn subscribed_channels(
        &self,
        raw_subscriber_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<ChannelEntry>> {
        let subscriber_id = parse_id(raw_subscriber_id, "subscriber")?;
        self.require_user(&subscriber_id, "User not found").await?;

        let page = self
            .subscription_repo
            .find_channels(&subscriber_id, request)
            .await?;

        Ok(page.filter_map(|(sub, user)| {
            user.map(|user| ChannelEntry {
                subscribed_at: sub.created_at,
                channel: user.into(),
            })
        }))
    }

    async fn require_user(&self, id: &str, missing: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(missing.to_string()))
    }
}
