//! # Feedsync
//!
//! A post synchronization engine: an in-memory feed that mirrors a remote
//! post collection and changes only after the remote store confirms.
//!
//! ## Overview
//!
//! - **Feed cache**: ordered posts, unique by id, newest inserts first
//! - **Mutation gate**: one mutating operation at a time, process-wide
//! - **Engine**: load, create, like, edit, delete and repost, each applied to
//!   the cache only after the store call succeeds
//!
//! ## Key Guarantees
//!
//! - **Write after confirmation**: no entry is added, changed or removed
//!   before the store acknowledges the matching call.
//! - **Atomic from the cache's view**: a failed operation leaves the cache
//!   exactly as it was.
//! - **Local checks first**: blank content and unknown ids are rejected
//!   without calling the store.
//! - **Always released**: the gate is dropped on every exit path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedsync::{Author, EngineConfig, SyncEngine};
//! use feedsync::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("feed.db").unwrap();
//!
//!     // Loads the feed once
//!     let engine = SyncEngine::start(store, EngineConfig::default()).await;
//!
//!     let me = Author::generate();
//!     let post = engine.create_post("hello", me.clone()).await.unwrap();
//!     engine.like_post(post.id).await.unwrap();
//!     engine.repost_post(post.id, me).await.unwrap();
//!
//!     for post in engine.snapshot() {
//!         println!("{}: {} ({} likes)", post.author, post.content, post.likes);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `feedsync::core` - Data model and feed cache
//! - `feedsync::store` - Store trait and backends

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;

// Re-export component crates
pub use feedsync_core as core;
pub use feedsync_store as store;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use engine::{EngineStats, Operation, SyncEngine};
pub use error::{EngineError, Result};
pub use gate::{GateGuard, MutationGate};

// Re-export commonly used core types
pub use feedsync_core::{Author, Feed, NewPost, Post, PostId, PostPatch, ValidationError};
pub use feedsync_store::{PostStore, StoreError};
