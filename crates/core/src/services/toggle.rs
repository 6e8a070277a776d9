//! Idempotent toggle over association records (likes, subscriptions).
//!
//! The store must back each (actor, target) pair with a unique index. The
//! toggle then tries an insert that is a no-op on conflict; when nothing was
//! inserted the existing row is read and deleted. A delete that removes
//! nothing means a concurrent toggle got there first, reported as `Conflict`.

use serde::Serialize;
use vidtube_common::{AppError, AppResult};

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Created,
    Deleted,
}

/// Result of a toggle: the action taken and the record created or removed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome<T> {
    pub action: ToggleAction,
    pub record: T,
}

impl<T> ToggleOutcome<T> {
    /// Whether the association exists after the toggle.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.action == ToggleAction::Created
    }
}

/// Storage operations for one (actor, target) pair.
#[async_trait::async_trait]
pub trait AssociationStore: Send + Sync {
    type Record: Clone + Send + Sync;

    /// Insert `record` unless the pair already exists. `true` if inserted.
    async fn insert_if_absent(&self, record: &Self::Record) -> AppResult<bool>;

    /// The existing record for the pair, if any.
    async fn find(&self) -> AppResult<Option<Self::Record>>;

    /// Delete the pair's record. Returns rows removed.
    async fn delete(&self) -> AppResult<u64>;
}

/// Flip the association: create `candidate` if absent, delete the existing row if present.
pub async fn toggle<S: AssociationStore>(
    store: &S,
    candidate: S::Record,
) -> AppResult<ToggleOutcome<S::Record>> {
    if store.insert_if_absent(&candidate).await? {
        return Ok(ToggleOutcome {
            action: ToggleAction::Created,
            record: candidate,
        });
    }

    let existing = store.find().await?.ok_or_else(concurrent_toggle)?;

    if store.delete().await? == 0 {
        return Err(concurrent_toggle());
    }

    Ok(ToggleOutcome {
        action: ToggleAction::Deleted,
        record: existing,
    })
}

fn concurrent_toggle() -> AppError {
    AppError::Conflict("Concurrent toggle in progress, try again".to_string())
}
