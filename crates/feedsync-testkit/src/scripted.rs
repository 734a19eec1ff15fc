//! A scriptable store wrapper for engine tests.
//!
//! [`ScriptedStore`] forwards to an inner store, but can be told to fail
//! particular methods, to acknowledge an insert without a record, or to hold
//! every call open until released. It counts every call it receives,
//! including the ones it fails.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use feedsync_core::{NewPost, Post, PostId, PostPatch};
use feedsync_store::{MemoryStore, PostStore, Result, StoreError};

/// A store method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    List,
    Insert,
    Update,
    Delete,
}

/// Number of calls received per method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub insert: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    /// Calls of any method.
    pub fn total(&self) -> usize {
        self.list + self.insert + self.update + self.delete
    }

    /// Calls that could change the collection.
    pub fn mutating(&self) -> usize {
        self.insert + self.update + self.delete
    }
}

#[derive(Debug, Clone)]
enum Fault {
    Fail(String),
    NoRecord,
}

/// Store wrapper with scripted faults.
///
/// A faulted call never reaches the inner store.
pub struct ScriptedStore<S = MemoryStore> {
    inner: S,
    calls: Mutex<CallCounts>,
    /// One-shot faults, consumed in order.
    queued: Mutex<HashMap<Method, VecDeque<Fault>>>,
    /// Faults applied to every call until healed.
    sticky: Mutex<HashMap<Method, String>>,
    held: watch::Sender<bool>,
    /// Calls currently waiting on a hold.
    parked: watch::Sender<usize>,
}

impl<S: PostStore> ScriptedStore<S> {
    /// Wrap `inner` with no faults scripted.
    pub fn new(inner: S) -> Self {
        let (held, _) = watch::channel(false);
        let (parked, _) = watch::channel(0);
        Self {
            inner,
            calls: Mutex::new(CallCounts::default()),
            queued: Mutex::new(HashMap::new()),
            sticky: Mutex::new(HashMap::new()),
            held,
            parked,
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Calls received so far.
    pub fn calls(&self) -> CallCounts {
        *lock(&self.calls)
    }

    /// Fail the next call of `method` with `message`.
    pub fn fail_next(&self, method: Method, message: impl Into<String>) {
        lock(&self.queued)
            .entry(method)
            .or_default()
            .push_back(Fault::Fail(message.into()));
    }

    /// Fail every call of `method` until [`heal`](Self::heal).
    pub fn fail_always(&self, method: Method, message: impl Into<String>) {
        lock(&self.sticky).insert(method, message.into());
    }

    /// Acknowledge the next insert without returning a record.
    pub fn omit_next_record(&self) {
        lock(&self.queued)
            .entry(Method::Insert)
            .or_default()
            .push_back(Fault::NoRecord);
    }

    /// Drop every scripted fault.
    pub fn heal(&self) {
        lock(&self.queued).clear();
        lock(&self.sticky).clear();
    }

    /// Hold subsequent calls open until [`release`](Self::release).
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Let held calls proceed.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Wait until at least one call is parked on a hold.
    pub async fn wait_for_call(&self) {
        let mut parked = self.parked.subscribe();
        loop {
            let count = *parked.borrow_and_update();
            if count > 0 || parked.changed().await.is_err() {
                break;
            }
        }
    }

    /// Number of calls parked on a hold.
    pub fn parked(&self) -> usize {
        *self.parked.borrow()
    }

    async fn enter(&self, method: Method) -> Option<Fault> {
        {
            let mut calls = lock(&self.calls);
            match method {
                Method::List => calls.list += 1,
                Method::Insert => calls.insert += 1,
                Method::Update => calls.update += 1,
                Method::Delete => calls.delete += 1,
            }
        }

        let mut held = self.held.subscribe();
        let is_held = *held.borrow_and_update();
        if is_held {
            let _parked = Parked::enter(&self.parked);
            while held.changed().await.is_ok() {
                let is_held = *held.borrow_and_update();
                if !is_held {
                    break;
                }
            }
        }

        if let Some(fault) = lock(&self.queued)
            .get_mut(&method)
            .and_then(VecDeque::pop_front)
        {
            return Some(fault);
        }
        lock(&self.sticky)
            .get(&method)
            .map(|message| Fault::Fail(message.clone()))
    }
}

/// Counts a call as parked until dropped, including when the call is
/// cancelled mid-wait.
struct Parked<'a>(&'a watch::Sender<usize>);

impl<'a> Parked<'a> {
    fn enter(count: &'a watch::Sender<usize>) -> Self {
        count.send_modify(|n| *n += 1);
        Self(count)
    }
}

impl Drop for Parked<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n -= 1);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fail<T>(message: String) -> Result<T> {
    Err(StoreError::Remote(message))
}

#[async_trait]
impl<S: PostStore> PostStore for ScriptedStore<S> {
    async fn list(&self) -> Result<Vec<Post>> {
        match self.enter(Method::List).await {
            Some(Fault::Fail(message)) => fail(message),
            Some(Fault::NoRecord) | None => self.inner.list().await,
        }
    }

    async fn insert(&self, post: &NewPost) -> Result<Option<Post>> {
        match self.enter(Method::Insert).await {
            Some(Fault::Fail(message)) => fail(message),
            Some(Fault::NoRecord) => Ok(None),
            None => self.inner.insert(post).await,
        }
    }

    async fn update_by_id(&self, id: PostId, patch: &PostPatch) -> Result<()> {
        match self.enter(Method::Update).await {
            Some(Fault::Fail(message)) => fail(message),
            Some(Fault::NoRecord) | None => self.inner.update_by_id(id, patch).await,
        }
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        match self.enter(Method::Delete).await {
            Some(Fault::Fail(message)) => fail(message),
            Some(Fault::NoRecord) | None => self.inner.delete_by_id(id).await,
        }
    }
}
