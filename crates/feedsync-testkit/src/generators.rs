//! Proptest generators for property-based testing.

use proptest::prelude::*;

use feedsync_core::{Author, PostId};

/// Ids at or above this are never handed out by the test stores.
pub const MISSING_ID_BASE: i64 = 1_000_000;

/// Generate non-blank post content.
pub fn content() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 !?.,]{0,40}[a-zA-Z0-9]".prop_map(String::from),
        "\\PC{1,20}".prop_filter("must not be blank", |s| !s.trim().is_empty()),
    ]
}

/// Generate content that is empty after trimming.
pub fn blank_content() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate an author id.
pub fn author() -> impl Strategy<Value = Author> {
    prop_oneof![
        Just(Author::new("Deku")),
        Just(Author::new("User123")),
        "user_[a-z0-9]{9}".prop_map(Author::new),
    ]
}

/// Which post an operation is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTarget {
    /// The post at this index of the current feed, modulo its length.
    Cached(usize),
    /// An id no store has handed out.
    Missing(u16),
}

impl OpTarget {
    /// Resolve against the ids currently in the feed.
    ///
    /// A cached target on an empty feed resolves to a missing id.
    pub fn resolve(&self, ids: &[PostId]) -> PostId {
        match *self {
            OpTarget::Cached(index) if !ids.is_empty() => ids[index % ids.len()],
            OpTarget::Cached(index) => PostId::new(MISSING_ID_BASE + (index % 1024) as i64),
            OpTarget::Missing(offset) => PostId::new(MISSING_ID_BASE + i64::from(offset)),
        }
    }
}

/// Generate a target, mostly aimed at cached posts.
pub fn op_target() -> impl Strategy<Value = OpTarget> {
    prop_oneof![
        4 => any::<usize>().prop_map(OpTarget::Cached),
        1 => any::<u16>().prop_map(OpTarget::Missing),
    ]
}

/// A user intent, plus whether the store should fail it.
#[derive(Debug, Clone)]
pub enum FeedOp {
    Create {
        content: String,
        author: Author,
        fail: bool,
    },
    Like {
        target: OpTarget,
        fail: bool,
    },
    Edit {
        target: OpTarget,
        content: String,
        fail: bool,
    },
    Delete {
        target: OpTarget,
        fail: bool,
    },
    Repost {
        target: OpTarget,
        author: Author,
        fail: bool,
    },
}

impl FeedOp {
    /// Whether the store call for this op should be failed.
    pub fn fails(&self) -> bool {
        match self {
            FeedOp::Create { fail, .. }
            | FeedOp::Like { fail, .. }
            | FeedOp::Edit { fail, .. }
            | FeedOp::Delete { fail, .. }
            | FeedOp::Repost { fail, .. } => *fail,
        }
    }
}

fn create_content() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => content(),
        1 => blank_content(),
    ]
}

/// Generate a single operation. About one in five is scripted to fail.
pub fn feed_op() -> impl Strategy<Value = FeedOp> {
    let fail = || prop::bool::weighted(0.2);
    prop_oneof![
        3 => (create_content(), author(), fail())
            .prop_map(|(content, author, fail)| FeedOp::Create { content, author, fail }),
        3 => (op_target(), fail()).prop_map(|(target, fail)| FeedOp::Like { target, fail }),
        2 => (op_target(), create_content(), fail())
            .prop_map(|(target, content, fail)| FeedOp::Edit { target, content, fail }),
        2 => (op_target(), fail()).prop_map(|(target, fail)| FeedOp::Delete { target, fail }),
        2 => (op_target(), author(), fail())
            .prop_map(|(target, author, fail)| FeedOp::Repost { target, author, fail }),
    ]
}

/// Generate a sequence of up to `max_len` operations.
pub fn feed_ops(max_len: usize) -> impl Strategy<Value = Vec<FeedOp>> {
    prop::collection::vec(feed_op(), 0..=max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_content_is_not_blank(s in content()) {
            prop_assert!(!s.trim().is_empty());
        }

        #[test]
        fn prop_blank_content_is_blank(s in blank_content()) {
            prop_assert!(s.trim().is_empty());
        }

        #[test]
        fn prop_cached_target_resolves_into_feed(index in any::<usize>(), len in 1usize..20) {
            let ids: Vec<_> = (1..=len as i64).map(PostId::new).collect();
            let id = OpTarget::Cached(index).resolve(&ids);
            prop_assert!(ids.contains(&id));
        }

        #[test]
        fn prop_missing_target_is_never_cached(offset in any::<u16>(), len in 0usize..20) {
            let ids: Vec<_> = (1..=len as i64).map(PostId::new).collect();
            let id = OpTarget::Missing(offset).resolve(&ids);
            prop_assert!(!ids.contains(&id));
        }
    }

    #[test]
    fn test_cached_target_on_empty_feed() {
        let id = OpTarget::Cached(3).resolve(&[]);
        assert!(id.get() >= MISSING_ID_BASE);
    }
}
