//! Strong type definitions for feedsync.
//!
//! Identifiers are newtypes so a post id can't be passed where an author is
//! expected, and vice versa.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier of a post, assigned by the remote store on insert.
///
/// Immutable once assigned. Serializes as a bare integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl PostId {
    /// Create a post id from its raw value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Length of the random suffix in generated user ids.
const GENERATED_SUFFIX_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of the user who wrote a post.
///
/// No authentication backs this value; it is whatever the presentation layer
/// supplies as the current user.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Author(String);

impl Author {
    /// Wrap a user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random local user id, e.g. `user_k3j9x0a2b`.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..GENERATED_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("user_{suffix}"))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Author({})", self.0)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Author {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Author {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Current time in Unix milliseconds.
///
/// Falls back to zero if the system clock reads before the epoch.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_display() {
        let id = PostId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{:?}", id), "PostId(42)");
    }

    #[test]
    fn test_post_id_serializes_as_integer() {
        let json = serde_json::to_string(&PostId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: PostId = serde_json::from_str("7").unwrap();
        assert_eq!(back, PostId::new(7));
    }

    #[test]
    fn test_generated_author_shape() {
        let author = Author::generate();
        let suffix = author.as_str().strip_prefix("user_").unwrap();
        assert_eq!(suffix.len(), GENERATED_SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_authors_differ() {
        // 36^9 possibilities; a collision here means the rng is broken
        assert_ne!(Author::generate(), Author::generate());
    }

    #[test]
    fn test_now_millis_is_after_2024() {
        assert!(now_millis() > 1_704_067_200_000);
    }
}
