//! Tweet service.

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator, Page, PageRequest, parse_id};
use vidtube_db::{
    entities::{like::LikeTarget, tweet},
    repositories::{CommentParent, CommentRepository, LikeRepository, TweetRepository, UserRepository},
};

use crate::services::ownership::require_owner;
use crate::services::validation::not_blank;

/// Input for creating or editing a tweet.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TweetInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// Tweet service for business logic.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            tweet_repo,
            user_repo,
            comment_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a tweet.
    pub async fn create(&self, actor_id: &str, input: TweetInput) -> AppResult<tweet::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            content: Set(input.content.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.tweet_repo.create(model).await
    }

    /// Tweets of a user, newest first.
    pub async fn list_by_user(
        &self,
        raw_user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<tweet::Model>> {
        let user_id = parse_id(raw_user_id, "user")?;
        if self.user_repo.find_by_id(&user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.tweet_repo.find_by_owner(&user_id, request).await
    }

    /// Replace the content of one's own tweet.
    pub async fn update(
        &self,
        actor_id: &str,
        raw_id: &str,
        input: TweetInput,
    ) -> AppResult<tweet::Model> {
        input.validate()?;
        let id = parse_id(raw_id, "tweet")?;
        let tweet = require_owner(self.tweet_repo.find_by_id(&id).await?, actor_id)?;

        let mut model = tweet.into_active_model();
        model.content = Set(input.content.trim().to_string());
        model.updated_at = Set(Utc::now().into());

        self.tweet_repo.update(model).await
    }

    /// Delete one's own tweet with its comments and every like on either.
    pub async fn delete(&self, actor_id: &str, raw_id: &str) -> AppResult<tweet::Model> {
        let id = parse_id(raw_id, "tweet")?;
        let tweet = require_owner(self.tweet_repo.find_by_id(&id).await?, actor_id)?;

        let comment_ids = self
            .comment_repo
            .ids_by_parent(CommentParent::Tweet(&id))
            .await?;
        self.like_repo
            .delete_for_targets(LikeTarget::Tweet, std::slice::from_ref(&id))
            .await?;
        self.like_repo
            .delete_for_targets(LikeTarget::Comment, &comment_ids)
            .await?;

        self.tweet_repo.delete(&id).await?;

        tracing::debug!(tweet_id = %id, owner_id = %actor_id, "Deleted tweet");
        Ok(tweet)
    }
}
