//! Property tests: random operation sequences against a scripted store.

use std::collections::HashSet;

use proptest::prelude::*;

use feedsync::store::MemoryStore;
use feedsync::{EngineConfig, EngineError, Post, PostId, PostStore, SyncEngine};
use feedsync_testkit::generators::feed_ops;
use feedsync_testkit::{FeedFixture, FeedOp, Method, ScriptedStore};

type Engine = SyncEngine<ScriptedStore<MemoryStore>>;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn by_id(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by_key(|p| p.id);
    posts
}

/// The store method an op reaches once its local checks pass.
fn method_of(op: &FeedOp) -> Method {
    match op {
        FeedOp::Create { .. } | FeedOp::Repost { .. } => Method::Insert,
        FeedOp::Like { .. } | FeedOp::Edit { .. } => Method::Update,
        FeedOp::Delete { .. } => Method::Delete,
    }
}

async fn apply(engine: &Engine, op: &FeedOp) -> Result<(), EngineError> {
    let ids: Vec<PostId> = engine.snapshot().iter().map(|p| p.id).collect();
    match op {
        FeedOp::Create { content, author, .. } => {
            engine.create_post(content.clone(), author.clone()).await.map(drop)
        }
        FeedOp::Like { target, .. } => engine.like_post(target.resolve(&ids)).await.map(drop),
        FeedOp::Edit { target, content, .. } => {
            engine.edit_post(target.resolve(&ids), content.clone()).await
        }
        FeedOp::Delete { target, .. } => engine.delete_post(target.resolve(&ids)).await,
        FeedOp::Repost { target, author, .. } => engine
            .repost_post(target.resolve(&ids), author.clone())
            .await
            .map(drop),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_cache_mirrors_confirmed_writes(ops in feed_ops(24)) {
        let rt = runtime();
        rt.block_on(async {
            let store = ScriptedStore::new(FeedFixture::demo().memory_store());
            let engine = SyncEngine::start(store, EngineConfig::default()).await;

            for op in &ops {
                let before = engine.snapshot();
                let calls_before = engine.store().calls();
                if op.fails() {
                    engine.store().fail_next(method_of(op), "scripted failure");
                }

                let result = apply(&engine, op).await;
                engine.store().heal();

                let after = engine.snapshot();
                let calls_after = engine.store().calls();

                // Ids stay unique.
                let unique: HashSet<_> = after.iter().map(|p| p.id).collect();
                prop_assert_eq!(unique.len(), after.len());

                match &result {
                    Err(e) => {
                        prop_assert_eq!(&after, &before, "failed {:?} changed the cache", op);
                        if e.is_local() {
                            prop_assert_eq!(calls_after, calls_before);
                        } else {
                            prop_assert!(op.fails());
                        }
                    }
                    Ok(()) => {
                        prop_assert!(!op.fails());
                        prop_assert_eq!(calls_after.mutating(), calls_before.mutating() + 1);
                    }
                }

                // Gate is free between operations.
                prop_assert!(!engine.is_busy());

                // Confirmed state matches the store.
                let stored = engine.store().inner().list().await.unwrap();
                prop_assert_eq!(by_id(after), by_id(stored));
            }
            Ok(())
        })?;
    }

    #[test]
    fn prop_successful_repost_prepends_one(ops in feed_ops(12)) {
        let rt = runtime();
        rt.block_on(async {
            let store = ScriptedStore::new(FeedFixture::demo().memory_store());
            let engine = SyncEngine::start(store, EngineConfig::default()).await;

            for op in &ops {
                let before = engine.snapshot();
                if let FeedOp::Repost { target, author, .. } = op {
                    let ids: Vec<PostId> = before.iter().map(|p| p.id).collect();
                    let id = target.resolve(&ids);
                    if let Ok(repost) = engine.repost_post(id, author.clone()).await {
                        let after = engine.snapshot();
                        prop_assert_eq!(after.len(), before.len() + 1);
                        prop_assert_eq!(&after[0], &repost);
                        prop_assert_eq!(&after[1..], &before[..]);
                        prop_assert_eq!(repost.reposted_from, Some(id));
                        prop_assert_eq!(repost.likes, 0);
                        prop_assert_eq!(&repost.author, author);
                    }
                } else {
                    let _ = apply(&engine, op).await;
                }
            }
            Ok(())
        })?;
    }
}
