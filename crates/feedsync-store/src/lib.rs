//! # Feedsync Store
//!
//! The remote post store contract and its implementations.
//!
//! ## Overview
//!
//! The engine never talks to a database directly. It calls the four
//! operations of the [`PostStore`] trait against a single collection of
//! posts, and treats every call as asynchronous and fallible.
//!
//! ## Key Types
//!
//! - [`PostStore`] - The async trait for `list`, `insert`, `update_by_id`, `delete_by_id`
//! - [`SqliteStore`] - SQLite-backed persistent store
//! - [`MemoryStore`] - In-memory store for tests and demos
//! - [`StoreError`] - Failure of a store call
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedsync_core::{Author, NewPost, now_millis};
//! use feedsync_store::{PostStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("feed.db").unwrap();
//!
//!     let new = NewPost::original("hello", Author::new("alice"), now_millis());
//!     let created = store.insert(&new).await.unwrap();
//!
//!     let posts = store.list().await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Store-assigned ids**: `insert` takes a post without an id and returns
//!   the stored record, or `None` if the backend acknowledged without one.
//! - **Acks only**: `update_by_id` and `delete_by_id` return nothing on
//!   success, including when no row matched.
//! - **Messages, not codes**: backends report failures as human-readable
//!   text; callers can't branch on a structured cause.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::PostStore;
