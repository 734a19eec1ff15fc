//! SQLite implementation of the PostStore trait.
//!
//! The persistent backend for feedsync. It uses rusqlite with bundled SQLite,
//! wrapped in async via `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use feedsync_core::{Author, NewPost, Post, PostId, PostPatch};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::PostStore;

const SELECT_POST: &str =
    "SELECT id, content, author, likes, comments, timestamp, reposted_from FROM posts";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let likes: i64 = row.get("likes")?;
    let comments: i64 = row.get("comments")?;

    Ok(Post {
        id: PostId::new(row.get("id")?),
        content: row.get("content")?,
        author: Author::new(row.get::<_, String>("author")?),
        likes: u64::try_from(likes)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(3, likes))?,
        comments: u64::try_from(comments)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, comments))?,
        timestamp: row.get("timestamp")?,
        reposted_from: row.get::<_, Option<i64>>("reposted_from")?.map(PostId::new),
    })
}

fn counter_to_sql(field: &str, value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{field} out of range: {value}")))
}

#[async_trait]
impl PostStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Post>> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_POST} ORDER BY id"))?;
            let posts = stmt
                .query_map([], row_to_post)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(posts)
        })
        .await
    }

    async fn insert(&self, post: &NewPost) -> Result<Option<Post>> {
        let post = post.clone();
        let likes = counter_to_sql("likes", post.likes)?;
        let comments = counter_to_sql("comments", post.comments)?;

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO posts (content, author, likes, comments, timestamp, reposted_from)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    post.content,
                    post.author.as_str(),
                    likes,
                    comments,
                    post.timestamp,
                    post.reposted_from.map(|id| id.get()),
                ],
            )?;

            let id = conn.last_insert_rowid();
            let stored = conn
                .query_row(
                    &format!("{SELECT_POST} WHERE id = ?1"),
                    params![id],
                    row_to_post,
                )
                .optional()?;
            Ok(stored)
        })
        .await
    }

    async fn update_by_id(&self, id: PostId, patch: &PostPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let content = patch.content.clone();
        let likes = patch
            .likes
            .map(|likes| counter_to_sql("likes", likes))
            .transpose()?;

        self.blocking(move |conn| {
            let changed = conn.execute(
                "UPDATE posts
                 SET content = COALESCE(?1, content), likes = COALESCE(?2, likes)
                 WHERE id = ?3",
                params![content, likes, id.get()],
            )?;
            if changed == 0 {
                tracing::debug!(post_id = %id, "update matched no rows");
            }
            Ok(())
        })
        .await
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        self.blocking(move |conn| {
            conn.execute("DELETE FROM posts WHERE id = ?1", params![id.get()])?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(content: &str, author: &str) -> NewPost {
        NewPost::original(content, Author::new(author), 1_731_405_600_000)
    }

    #[tokio::test]
    async fn test_sqlite_insert_assigns_id() {
        let store = SqliteStore::open_memory().unwrap();

        let a = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();
        let b = store.insert(&new_post("b", "bob")).await.unwrap().unwrap();

        assert_eq!(a.id, PostId::new(1));
        assert_eq!(b.id, PostId::new(2));
        assert_eq!(b.author, Author::new("bob"));
        assert_eq!(b.timestamp, 1_731_405_600_000);
        assert_eq!(b.reposted_from, None);
    }

    #[tokio::test]
    async fn test_sqlite_repost_round_trip() {
        let store = SqliteStore::open_memory().unwrap();
        let original = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();

        let repost = NewPost::repost_of(&original, Author::new("bob"), 99);
        let stored = store.insert(&repost).await.unwrap().unwrap();

        assert_eq!(stored.reposted_from, Some(original.id));
        assert_eq!(stored.content, "a");
        assert_eq!(stored.likes, 0);
    }

    #[tokio::test]
    async fn test_sqlite_partial_update() {
        let store = SqliteStore::open_memory().unwrap();
        let post = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();

        store
            .update_by_id(post.id, &PostPatch::likes(2))
            .await
            .unwrap();
        store
            .update_by_id(post.id, &PostPatch::content("edited"))
            .await
            .unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].likes, 2);
        assert_eq!(listed[0].content, "edited");
    }

    #[tokio::test]
    async fn test_sqlite_delete_is_idempotent() {
        let store = SqliteStore::open_memory().unwrap();
        let a = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();
        let b = store.insert(&new_post("b", "alice")).await.unwrap().unwrap();

        store.delete_by_id(a.id).await.unwrap();
        store.delete_by_id(a.id).await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id]);
    }

    #[tokio::test]
    async fn test_sqlite_ids_not_reused_after_delete() {
        let store = SqliteStore::open_memory().unwrap();
        let a = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();
        store.delete_by_id(a.id).await.unwrap();

        let b = store.insert(&new_post("b", "alice")).await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&new_post("kept", "alice")).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let posts = store.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "kept");
    }

    #[tokio::test]
    async fn test_sqlite_rejects_oversized_counter() {
        let store = SqliteStore::open_memory().unwrap();
        let post = store.insert(&new_post("a", "alice")).await.unwrap().unwrap();

        let err = store
            .update_by_id(post.id, &PostPatch::likes(u64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }
}
