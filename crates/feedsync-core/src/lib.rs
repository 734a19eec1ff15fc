//! # Feedsync Core
//!
//! Pure data model for feedsync: posts, partial updates, validation, and the
//! in-memory feed cache.
//!
//! This crate contains no I/O, no storage, no async. Everything here is
//! synchronous computation over owned values.
//!
//! ## Key Types
//!
//! - [`Post`] - A post as confirmed by the remote store
//! - [`NewPost`] - A candidate post without a store-assigned id
//! - [`PostPatch`] - Partial fields for `update_by_id`
//! - [`PostId`] - Store-assigned identifier
//! - [`Author`] - Identifier of the user who wrote a post
//! - [`Feed`] - Ordered cache of posts, unique by id
//!
//! ## Wire Shape
//!
//! Posts serialize with camelCase field names, matching the remote collection:
//!
//! ```text
//! { "id": 5, "content": "hi", "author": "alice", "likes": 0,
//!   "comments": 0, "timestamp": 1731405600000, "repostedFrom": 1 }
//! ```

pub mod error;
pub mod feed;
pub mod post;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use feed::Feed;
pub use post::{NewPost, Post, PostPatch};
pub use types::{now_millis, Author, PostId};
pub use validation::validate_content;
