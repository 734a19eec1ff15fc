//! # Feedsync Testkit
//!
//! Testing utilities for feedsync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: ready-made posts and seeded stores
//! - **Scripted store**: a [`PostStore`](feedsync_store::PostStore) wrapper
//!   that counts calls, injects failures and can hold calls in flight
//! - **Generators**: proptest strategies for content, authors and operation
//!   sequences
//! - **Tracing**: a subscriber for test output, filtered by `RUST_LOG`
//!
//! ## Fault Injection
//!
//! ```rust
//! use feedsync_testkit::{FeedFixture, Method, ScriptedStore};
//!
//! let fixture = FeedFixture::demo();
//! let store = ScriptedStore::new(fixture.memory_store());
//! store.fail_next(Method::Insert, "insert rejected");
//! assert_eq!(store.calls().insert, 0);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use feedsync_testkit::generators::{feed_ops, FeedOp};
//!
//! proptest! {
//!     #[test]
//!     fn cache_matches_store(ops in feed_ops(32)) {
//!         // drive an engine with `ops` and compare
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod scripted;

pub use fixtures::{post, FeedFixture};
pub use generators::{FeedOp, OpTarget};
pub use scripted::{CallCounts, Method, ScriptedStore};

/// Install a fmt subscriber for tests.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Safe to call from every test; only
/// the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
