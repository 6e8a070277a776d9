//! ID generation and validation.

use ulid::Ulid;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a random key for media objects.
    #[must_use]
    pub fn generate_media_key(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Whether `token` is a well-formed entity ID.
    #[must_use]
    pub fn is_valid(token: &str) -> bool {
        token.len() == 26 && Ulid::from_string(&token.to_ascii_uppercase()).is_ok()
    }
}

/// Validate an ID taken from a request and normalize it to storage form.
///
/// `what` names the entity in the error message, e.g. `"video"`.
pub fn parse_id(token: &str, what: &str) -> AppResult<String> {
    let token = token.trim();
    if IdGenerator::is_valid(token) {
        Ok(token.to_lowercase())
    } else {
        Err(AppError::InvalidArgument(format!("Invalid {what} id")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generated_ids_are_valid() {
        let id_gen = IdGenerator::new();
        assert!(IdGenerator::is_valid(&id_gen.generate()));
    }

    #[test]
    fn test_is_valid_rejects_garbage() {
        assert!(!IdGenerator::is_valid(""));
        assert!(!IdGenerator::is_valid("not-an-id"));
        assert!(!IdGenerator::is_valid("01arz3ndektsv4rrffq69g5fa")); // 25 chars
        assert!(!IdGenerator::is_valid("01arz3ndektsv4rrffq69g5favx")); // 27 chars
        assert!(!IdGenerator::is_valid("01arz3ndektsv4rrffq69g5fa!"));
    }

    #[test]
    fn test_parse_id_normalizes_case() {
        let id = parse_id("01ARZ3NDEKTSV4RRFFQ69G5FAV", "video").unwrap();
        assert_eq!(id, "01arz3ndektsv4rrffq69g5fav");
    }

    #[test]
    fn test_parse_id_error_names_entity() {
        match parse_id("nope", "tweet") {
            Err(AppError::InvalidArgument(msg)) => assert_eq!(msg, "Invalid tweet id"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_media_key() {
        let key = IdGenerator::new().generate_media_key();
        assert_eq!(key.len(), 32);
    }
}
