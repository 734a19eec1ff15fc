//! In-memory implementation of the PostStore trait.
//!
//! Same semantics as SQLite, no persistence. Useful for tests and for
//! seeding a demo feed.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use feedsync_core::{NewPost, Post, PostId, PostPatch};

use crate::error::{Result, StoreError};
use crate::traits::PostStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Posts in insertion order.
    posts: Vec<Post>,

    /// Next id to assign.
    next_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// Create a store that already holds `posts`.
    ///
    /// Assigned ids continue after the largest seeded id.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let next_id = posts.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(MemoryStoreInner { posts, next_id }),
        }
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.read().map(|inner| inner.posts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the stored post with `id`.
    pub fn get(&self, id: PostId) -> Option<Post> {
        self.read()
            .ok()?
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::remote("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::remote("memory store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Post>> {
        Ok(self.read()?.posts.clone())
    }

    async fn insert(&self, post: &NewPost) -> Result<Option<Post>> {
        let mut inner = self.write()?;

        let id = PostId::new(inner.next_id);
        inner.next_id += 1;

        let stored = Post::from_new(id, post.clone());
        inner.posts.push(stored.clone());
        Ok(Some(stored))
    }

    async fn update_by_id(&self, id: PostId, patch: &PostPatch) -> Result<()> {
        let mut inner = self.write()?;
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == id) {
            post.apply(patch);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        let mut inner = self.write()?;
        inner.posts.retain(|p| p.id != id);
        Ok(())
    }
}
