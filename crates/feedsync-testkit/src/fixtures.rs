//! Test fixtures and helpers.
//!
//! Common setup code for engine and store tests.

use feedsync_core::{Author, NewPost, Post, PostId};
use feedsync_store::MemoryStore;

/// Fixed creation time used by fixture posts (2024-11-12T10:00:00Z).
pub const FIXTURE_TIMESTAMP: i64 = 1_731_405_600_000;

/// Build a post with zeroed counters.
pub fn post(id: i64, content: &str, author: &str) -> Post {
    Post::from_new(
        PostId::new(id),
        NewPost::original(content, Author::new(author), FIXTURE_TIMESTAMP),
    )
}

/// A set of posts to seed a store with.
pub struct FeedFixture {
    pub posts: Vec<Post>,
}

impl FeedFixture {
    /// No posts.
    pub fn empty() -> Self {
        Self { posts: Vec::new() }
    }

    /// Two posts by different authors, with some likes and comments.
    pub fn demo() -> Self {
        let mut first = post(1, "Hello world! This is my first post", "Deku");
        first.likes = 5;
        first.comments = 2;

        let mut second = post(2, "Rust is awesome!", "User123");
        second.likes = 3;
        second.comments = 1;
        second.timestamp = FIXTURE_TIMESTAMP + 5_400_000;

        Self {
            posts: vec![first, second],
        }
    }

    /// `count` posts with ids `1..=count`, all by `author`.
    pub fn numbered(count: usize, author: &str) -> Self {
        Self {
            posts: (1..=count as i64)
                .map(|id| post(id, &format!("post {id}"), author))
                .collect(),
        }
    }

    /// Add a post.
    pub fn with(mut self, post: Post) -> Self {
        self.posts.push(post);
        self
    }

    /// A memory store holding these posts, in fixture order.
    pub fn memory_store(&self) -> MemoryStore {
        MemoryStore::with_posts(self.posts.clone())
    }

    pub fn ids(&self) -> Vec<PostId> {
        self.posts.iter().map(|p| p.id).collect()
    }
}

impl Default for FeedFixture {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync_store::PostStore;

    #[tokio::test]
    async fn test_demo_fixture_seeds_store() {
        let fixture = FeedFixture::demo();
        let store = fixture.memory_store();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, fixture.posts);
    }

    #[tokio::test]
    async fn test_numbered_fixture_ids() {
        let fixture = FeedFixture::numbered(3, "alice");
        assert_eq!(
            fixture.ids(),
            vec![PostId::new(1), PostId::new(2), PostId::new(3)]
        );

        let store = fixture.memory_store();
        let next = store
            .insert(&NewPost::original("x", Author::new("bob"), 0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, PostId::new(4));
    }
}
