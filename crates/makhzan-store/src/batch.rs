//! Best-effort batched writes.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;
use tracing::debug;

use crate::datastore::ObjectDatastore;
use crate::error::Result;
use crate::keys::Key;

/// Accumulates puts and deletes in memory and commits them as one concurrent
/// fan-out against the datastore.
///
/// Batches are not atomic: every queued operation is issued independently,
/// the first failure is surfaced, and operations that already applied are
/// not rolled back. Queuing the same key twice for put keeps the last value;
/// queuing a key for both put and delete issues both operations
/// concurrently, so which one wins is undefined.
pub struct Batch {
    store: ObjectDatastore,
    puts: HashMap<Key, Bytes>,
    deletes: HashSet<Key>,
}

impl Batch {
    pub(crate) fn new(store: ObjectDatastore) -> Self {
        Self {
            store,
            puts: HashMap::new(),
            deletes: HashSet::new(),
        }
    }

    /// Queue a put. Nothing touches the backing store until commit.
    pub fn put(&mut self, key: Key, value: Bytes) {
        self.puts.insert(key, value);
    }

    /// Queue a delete. Nothing touches the backing store until commit.
    pub fn delete(&mut self, key: Key) {
        self.deletes.insert(key);
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.puts.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty()
    }

    /// Issue every queued operation concurrently and wait for all of them.
    pub async fn commit(self) -> Result<()> {
        debug!(
            puts = self.puts.len(),
            deletes = self.deletes.len(),
            "committing batch"
        );

        let mut operations: Vec<BoxFuture<'static, Result<()>>> =
            Vec::with_capacity(self.puts.len() + self.deletes.len());

        for (key, value) in self.puts {
            let store = self.store.clone();
            operations.push(async move { store.put(&key, value).await }.boxed());
        }
        for key in self.deletes {
            let store = self.store.clone();
            operations.push(async move { store.delete(&key).await }.boxed());
        }

        let results = join_all(operations).await;
        for result in results {
            result?;
        }
        Ok(())
    }
}
