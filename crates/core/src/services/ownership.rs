//! Ownership gate for owned content.

use vidtube_common::{AppError, AppResult};
use vidtube_db::entities::{comment, playlist, tweet, video};

/// A record with a single owner who alone may change it.
pub trait Owned {
    /// Name used in error messages, e.g. `"Video"`.
    const KIND: &'static str;

    /// ID of the owning user.
    fn owner_id(&self) -> &str;
}

impl Owned for video::Model {
    const KIND: &'static str = "Video";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for tweet::Model {
    const KIND: &'static str = "Tweet";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for comment::Model {
    const KIND: &'static str = "Comment";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for playlist::Model {
    const KIND: &'static str = "Playlist";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// `NotFound` for a missing record, `Forbidden` for someone else's.
///
/// The existence check always comes first so a missing record reports the
/// same error whoever asks.
pub fn require_owner<T: Owned>(record: Option<T>, actor_id: &str) -> AppResult<T> {
    let record = record.ok_or_else(|| AppError::NotFound(format!("{} not found", T::KIND)))?;
    if record.owner_id() != actor_id {
        return Err(AppError::Forbidden(format!(
            "You do not have permission to modify this {}",
            T::KIND.to_lowercase()
        )));
    }
    Ok(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tweet_owned_by(owner: &str) -> tweet::Model {
        tweet::Model {
            id: "t1".to_string(),
            owner_id: owner.to_string(),
            content: "hi".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_owner_passes() {
        let tweet = require_owner(Some(tweet_owned_by("alice")), "alice").unwrap();
        assert_eq!(tweet.id, "t1");
    }

    #[test]
    fn test_non_owner_forbidden() {
        let result = require_owner(Some(tweet_owned_by("alice")), "bob");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_missing_is_not_found_for_everyone() {
        for actor in ["alice", "bob"] {
            match require_owner::<tweet::Model>(None, actor) {
                Err(AppError::NotFound(msg)) => assert_eq!(msg, "Tweet not found"),
                other => panic!("Expected NotFound, got {other:?}"),
            }
        }
    }
}
