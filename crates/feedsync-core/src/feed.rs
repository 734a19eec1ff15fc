//! The feed cache: an ordered, id-unique mirror of the remote collection.
//!
//! The cache has no write path of its own. Every mutation here is applied
//! by the engine after the store has confirmed the matching remote call, so
//! the cache never holds a post the store hasn't acknowledged.

use std::collections::HashSet;

use crate::post::{Post, PostPatch};
use crate::types::PostId;

/// Ordered sequence of posts, newest inserts first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    posts: Vec<Post>,
}

impl Feed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self { posts: Vec::new() }
    }

    /// Replace every entry with `posts`, keeping their order.
    ///
    /// If the store returns the same id twice, only the first occurrence is
    /// kept. Returns the number of entries dropped that way.
    pub fn replace_all(&mut self, posts: Vec<Post>) -> usize {
        let total = posts.len();
        let mut seen = HashSet::with_capacity(total);
        self.posts = posts.into_iter().filter(|p| seen.insert(p.id)).collect();
        total - self.posts.len()
    }

    /// Put a post at the head of the feed.
    ///
    /// Any existing entry with the same id is removed first.
    pub fn prepend(&mut self, post: Post) {
        self.posts.retain(|p| p.id != post.id);
        self.posts.insert(0, post);
    }

    /// Apply a patch to the entry with `id`.
    ///
    /// Returns the updated post, or `None` if no entry matches.
    pub fn update(&mut self, id: PostId, patch: &PostPatch) -> Option<&Post> {
        let post = self.posts.iter_mut().find(|p| p.id == id)?;
        post.apply(patch);
        Some(post)
    }

    /// Remove the entry with `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: PostId) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(index))
    }

    /// Look up a post by id.
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Check whether a post with `id` is cached.
    pub fn contains(&self, id: PostId) -> bool {
        self.get(id).is_some()
    }

    /// The original of a repost, if it is still cached.
    pub fn referenced(&self, post: &Post) -> Option<&Post> {
        post.reposted_from.and_then(|id| self.get(id))
    }

    /// All posts in feed order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Iterate in feed order.
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}
