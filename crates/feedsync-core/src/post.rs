//! Posts: the sole entity of the feed.
//!
//! A [`Post`] only exists once the remote store has assigned it an id.
//! Before that it is a [`NewPost`]; after that it changes only through a
//! [`PostPatch`] that the store has acknowledged.

use serde::{Deserialize, Serialize};

use crate::types::{Author, PostId};

/// A post confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned identifier.
    pub id: PostId,
    /// Non-empty text. The only field users can edit.
    pub content: String,
    /// Set at creation, never changed.
    pub author: Author,
    /// Like counter. Only ever increments.
    pub likes: u64,
    /// Display-only counter. No operation mutates it.
    pub comments: u64,
    /// Creation time (Unix ms).
    pub timestamp: i64,
    /// The original post, present only on reposts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reposted_from: Option<PostId>,
}

impl Post {
    /// Attach a store-assigned id to a candidate post.
    pub fn from_new(id: PostId, new: NewPost) -> Self {
        Self {
            id,
            content: new.content,
            author: new.author,
            likes: new.likes,
            comments: new.comments,
            timestamp: new.timestamp,
            reposted_from: new.reposted_from,
        }
    }

    /// Whether this post is a repost of another.
    pub fn is_repost(&self) -> bool {
        self.reposted_from.is_some()
    }

    /// Apply acknowledged partial fields in place.
    pub fn apply(&mut self, patch: &PostPatch) {
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
    }
}

/// A post without an id, submitted to the store's `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub content: String,
    pub author: Author,
    pub likes: u64,
    pub comments: u64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reposted_from: Option<PostId>,
}

impl NewPost {
    /// A fresh post with zeroed counters.
    pub fn original(content: impl Into<String>, author: Author, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            author,
            likes: 0,
            comments: 0,
            timestamp,
            reposted_from: None,
        }
    }

    /// A repost of `original` by `author`.
    ///
    /// The content is copied, not referenced, so the repost stays
    /// displayable after the original is deleted.
    pub fn repost_of(original: &Post, author: Author, timestamp: i64) -> Self {
        Self {
            content: original.content.clone(),
            author,
            likes: 0,
            comments: 0,
            timestamp,
            reposted_from: Some(original.id),
        }
    }
}

/// Partial fields for `update_by_id`. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

impl PostPatch {
    /// Patch that replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            likes: None,
        }
    }

    /// Patch that sets the like counter.
    pub fn likes(likes: u64) -> Self {
        Self {
            content: None,
            likes: Some(likes),
        }
    }

    /// True if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.likes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post::from_new(
            PostId::new(1),
            NewPost::original("Hello world!", Author::new("Deku"), 1_731_405_600_000),
        )
    }

    #[test]
    fn test_original_has_zero_counters() {
        let new = NewPost::original("hi", Author::new("alice"), 10);
        assert_eq!(new.likes, 0);
        assert_eq!(new.comments, 0);
        assert_eq!(new.reposted_from, None);
    }

    #[test]
    fn test_repost_copies_content() {
        let mut original = sample();
        original.likes = 5;

        let repost = NewPost::repost_of(&original, Author::new("bob"), 20);
        assert_eq!(repost.content, original.content);
        assert_eq!(repost.author, Author::new("bob"));
        assert_eq!(repost.likes, 0);
        assert_eq!(repost.reposted_from, Some(original.id));
    }

    #[test]
    fn test_apply_patch() {
        let mut post = sample();
        post.apply(&PostPatch::likes(3));
        assert_eq!(post.likes, 3);
        assert_eq!(post.content, "Hello world!");

        post.apply(&PostPatch::content("edited"));
        assert_eq!(post.content, "edited");
        assert_eq!(post.likes, 3);

        let before = post.clone();
        post.apply(&PostPatch::default());
        assert_eq!(post, before);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["author"], "Deku");
        assert_eq!(json["timestamp"], 1_731_405_600_000i64);
        assert!(json.get("repostedFrom").is_none());

        let repost = Post::from_new(
            PostId::new(2),
            NewPost::repost_of(&sample(), Author::new("bob"), 0),
        );
        let json = serde_json::to_value(&repost).unwrap();
        assert_eq!(json["repostedFrom"], 1);
    }

    #[test]
    fn test_deserialize_without_repost_field() {
        let json = r#"{"id":3,"content":"x","author":"a","likes":1,"comments":0,"timestamp":5}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, PostId::new(3));
        assert!(!post.is_repost());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let json = serde_json::to_string(&PostPatch::likes(4)).unwrap();
        assert_eq!(json, r#"{"likes":4}"#);
        assert!(PostPatch::default().is_empty());
    }
}
