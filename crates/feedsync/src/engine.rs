//! The synchronization engine: every feed mutation goes through here.
//!
//! Each operation follows the same shape:
//!
//! 1. take the mutation gate (or fail with [`EngineError::Busy`])
//! 2. check local preconditions
//! 3. call the store
//! 4. on success, apply the confirmed result to the feed cache
//! 5. release the gate, whatever happened
//!
//! The cache is never touched before the store confirms, and never touched at
//! all on failure.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use feedsync_core::{
    now_millis, validate_content, Author, Feed, NewPost, Post, PostId, PostPatch,
};
use feedsync_store::PostStore;
use tokio::sync::watch;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::gate::MutationGate;

/// A user intent handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Create,
    Like,
    Edit,
    Delete,
    Repost,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Like => "like",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
            Operation::Repost => "repost",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters over the engine's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Operations that completed and updated the cache.
    pub succeeded: u64,
    /// Operations that failed validation, lookup, or the remote call.
    pub failed: u64,
    /// Operations turned away because the gate was held.
    pub rejected_busy: u64,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

/// The engine mediating between the feed cache and the post store.
pub struct SyncEngine<S: PostStore> {
    /// The remote store.
    store: Arc<S>,
    /// Configuration.
    config: EngineConfig,
    /// Serializes mutating operations.
    gate: MutationGate,
    /// Confirmed mirror of the remote collection.
    feed: RwLock<Feed>,
    stats: RwLock<EngineStats>,
}

impl<S: PostStore> SyncEngine<S> {
    /// Create an engine with an empty feed. Does not call the store.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            gate: MutationGate::new(),
            feed: RwLock::new(Feed::new()),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    /// Create an engine and, if configured, load the feed once.
    ///
    /// A failed load leaves the feed empty. The failure is logged and kept in
    /// [`stats`](Self::stats); the engine is returned either way.
    pub async fn start(store: S, config: EngineConfig) -> Self {
        let engine = Self::new(store, config);
        if engine.config.load_on_start {
            if let Ok(count) = engine.load_feed().await {
                tracing::info!(posts = count, "engine started");
            }
        }
        engine
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Access (never gated)
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a mutating operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Watch the busy flag, e.g. to drive a progress indicator.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.gate.subscribe()
    }

    /// Copy of the current feed, in display order.
    pub fn snapshot(&self) -> Vec<Post> {
        self.feed_read().posts().to_vec()
    }

    /// Copy of a cached post.
    pub fn post(&self, id: PostId) -> Option<Post> {
        self.feed_read().get(id).cloned()
    }

    /// Run `f` against the feed without copying it.
    pub fn with_feed<R>(&self, f: impl FnOnce(&Feed) -> R) -> R {
        f(&self.feed_read())
    }

    pub fn len(&self) -> usize {
        self.feed_read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed_read().is_empty()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutating Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the feed with the store's listing, in the order returned.
    ///
    /// Returns the number of cached posts.
    pub async fn load_feed(&self) -> Result<usize> {
        self.guarded(Operation::Load, async {
            let posts = self.remote(self.store.list()).await?;

            let (dropped, count) = {
                let mut feed = self.feed_write();
                let dropped = feed.replace_all(posts);
                (dropped, feed.len())
            };
            if dropped > 0 {
                tracing::warn!(dropped, "store listed duplicate post ids");
            }
            Ok(count)
        })
        .await
    }

    /// Create a post and put it at the head of the feed.
    pub async fn create_post(&self, content: impl Into<String>, author: Author) -> Result<Post> {
        let content = content.into();
        self.guarded(Operation::Create, async move {
            validate_content(&content)?;
            let candidate = NewPost::original(content, author, now_millis());
            self.insert_at_head(&candidate).await
        })
        .await
    }

    /// Add one like to a cached post.
    ///
    /// The displayed count changes only after the store confirms.
    pub async fn like_post(&self, id: PostId) -> Result<Post> {
        self.guarded(Operation::Like, async move {
            let likes = self.cached(id)?.likes.saturating_add(1);
            let patch = PostPatch::likes(likes);

            self.remote(self.store.update_by_id(id, &patch)).await?;
            self.apply_patch(id, &patch).ok_or(EngineError::NotFound(id))
        })
        .await
    }

    /// Replace a post's content.
    ///
    /// On failure the caller still owns `new_content`'s original text, so an
    /// edit form can keep what the user typed.
    pub async fn edit_post(&self, id: PostId, new_content: impl Into<String>) -> Result<()> {
        let new_content = new_content.into();
        self.guarded(Operation::Edit, async move {
            validate_content(&new_content)?;
            let patch = PostPatch::content(new_content);

            self.remote(self.store.update_by_id(id, &patch)).await?;
            if self.apply_patch(id, &patch).is_none() {
                tracing::debug!(post_id = %id, "edited post is not cached");
            }
            Ok(())
        })
        .await
    }

    /// Delete a post.
    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        self.guarded(Operation::Delete, async move {
            self.remote(self.store.delete_by_id(id)).await?;
            if self.feed_write().remove(id).is_none() {
                tracing::debug!(post_id = %id, "deleted post is not cached");
            }
            Ok(())
        })
        .await
    }

    /// Repost a cached post as `author`.
    ///
    /// The original is left untouched.
    pub async fn repost_post(&self, id: PostId, author: Author) -> Result<Post> {
        self.guarded(Operation::Repost, async move {
            let original = self.cached(id)?;
            let candidate = NewPost::repost_of(&original, author, now_millis());
            self.insert_at_head(&candidate).await
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `body` while holding the gate, then record the outcome.
    async fn guarded<T, F>(&self, op: Operation, body: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = match self.gate.try_acquire() {
            Some(_guard) => {
                tracing::debug!(%op, "operation started");
                body.await
            }
            None => Err(EngineError::Busy),
        };
        self.record(op, &result);
        result
    }

    /// Await a store call, bounded by the configured timeout.
    async fn remote<T>(
        &self,
        call: impl Future<Output = feedsync_store::Result<T>>,
    ) -> Result<T> {
        match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => Ok(result?),
                Err(_) => Err(EngineError::Timeout(limit)),
            },
            None => Ok(call.await?),
        }
    }

    async fn insert_at_head(&self, candidate: &NewPost) -> Result<Post> {
        let stored = self
            .remote(self.store.insert(candidate))
            .await?
            .ok_or(EngineError::NoRecordReturned)?;

        self.feed_write().prepend(stored.clone());
        Ok(stored)
    }

    fn cached(&self, id: PostId) -> Result<Post> {
        self.post(id).ok_or(EngineError::NotFound(id))
    }

    fn apply_patch(&self, id: PostId, patch: &PostPatch) -> Option<Post> {
        self.feed_write().update(id, patch).cloned()
    }

    fn record<T>(&self, op: Operation, result: &Result<T>) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(_) => {
                stats.succeeded += 1;
                stats.last_error = None;
                tracing::debug!(%op, "operation succeeded");
            }
            Err(EngineError::Busy) => {
                stats.rejected_busy += 1;
                tracing::debug!(%op, "operation rejected: gate busy");
            }
            Err(e) => {
                stats.failed += 1;
                stats.last_error = Some(format!("{op}: {e}"));
                tracing::warn!(%op, error = %e, "operation failed");
            }
        }
    }

    fn feed_read(&self) -> RwLockReadGuard<'_, Feed> {
        self.feed.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn feed_write(&self) -> RwLockWriteGuard<'_, Feed> {
        self.feed.write().unwrap_or_else(PoisonError::into_inner)
    }
}
