//! User service.

use serde::Serialize;
use vidtube_common::AppResult;
use vidtube_db::{entities::user, repositories::UserRepository};

/// The public projection of a user shown next to content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

impl From<user::Model> for PublicProfile {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar: user.avatar_url,
        }
    }
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.user_repo.find_by_token(token).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    const ALICE: &str = "01hzy8b3k6m2n4p5q7r8s9t0va";

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Liddell".to_string(),
            avatar_url: "https://cdn.test/alice.png".to_string(),
            cover_image_url: None,
            token: Some("secret".to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_public_profile_projection() {
        let profile = PublicProfile::from(create_test_user(ALICE));
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["fullName"], "Alice Liddell");
        assert_eq!(json["avatar"], "https://cdn.test/alice.png");
        assert!(json.get("email").is_none());
    }

    #[tokio::test]
    async fn test_empty_token_skips_lookup() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db));

        assert!(service.authenticate_by_token("").await.unwrap().is_none());
    }
}
