//! PostStore trait: the abstract interface to the remote post collection.
//!
//! This is the only boundary the engine depends on. Implementations include
//! SQLite (persistent) and in-memory (for tests).

use async_trait::async_trait;
use feedsync_core::{NewPost, Post, PostId, PostPatch};

use crate::error::Result;

/// Async CRUD over a single collection of posts.
///
/// Every call may fail for transport or server-side reasons. The caller must
/// not assume anything about the collection after a failed call beyond
/// "unknown".
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Fetch every post, in the store's natural order.
    async fn list(&self) -> Result<Vec<Post>>;

    /// Store a new post and return it with its assigned id.
    ///
    /// `Ok(None)` means the backend acknowledged the call without returning
    /// a record. Callers must treat that as a failure.
    async fn insert(&self, post: &NewPost) -> Result<Option<Post>>;

    /// Apply partial fields to the post with `id`.
    async fn update_by_id(&self, id: PostId, patch: &PostPatch) -> Result<()>;

    /// Delete the post with `id`.
    async fn delete_by_id(&self, id: PostId) -> Result<()>;
}

#[async_trait]
impl<S: PostStore + ?Sized> PostStore for std::sync::Arc<S> {
    async fn list(&self) -> Result<Vec<Post>> {
        (**self).list().await
    }

    async fn insert(&self, post: &NewPost) -> Result<Option<Post>> {
        (**self).insert(post).await
    }

    async fn update_by_id(&self, id: PostId, patch: &PostPatch) -> Result<()> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        (**self).delete_by_id(id).await
    }
}
