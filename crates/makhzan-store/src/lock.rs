//! Advisory repository lock.
//!
//! A single sentinel object under the repository directory encodes the lock
//! state: present means locked, absent means unlocked. The sentinel carries
//! no payload.
//!
//! With only put/head/delete available, check-then-create is two separate
//! network calls, so two concurrent lockers can both observe "unlocked" and
//! both create the sentinel. That window is inherent to the scheme; the lock
//! is advisory and meant for single-process or cooperative multi-process
//! use. Backends that advertise conditional put close the window, and the
//! lock uses that path automatically when available.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use makhzan_client::ObjectClient;
use tracing::{debug, warn};

use crate::error::{DatastoreError, Result};
use crate::paths::normalize_root;

/// File name of the lock sentinel within the repository directory.
pub const LOCK_FILE: &str = "repo.lock";

fn sentinel_name(dir: &str) -> String {
    let dir = normalize_root(dir);
    if dir.is_empty() {
        LOCK_FILE.to_string()
    } else {
        format!("{dir}/{LOCK_FILE}")
    }
}

/// Mutual-exclusion lock over a sentinel object.
pub struct RepoLock {
    client: Arc<dyn ObjectClient>,
}

impl RepoLock {
    pub fn new(client: Arc<dyn ObjectClient>) -> Self {
        Self { client }
    }

    /// Whether the repository at `dir` is currently locked.
    pub async fn locked(&self, dir: &str) -> Result<bool> {
        let name = sentinel_name(dir);
        match self.client.head(&name).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_missing() => Ok(false),
            Err(err) => Err(DatastoreError::Backend {
                op: "head",
                name,
                source: err,
            }),
        }
    }

    /// Acquire the lock for the repository at `dir`.
    ///
    /// Fails with [`DatastoreError::AlreadyLocked`] when a sentinel already
    /// exists or the existence check itself errors. The returned guard
    /// removes the sentinel on [`LockGuard::release`].
    pub async fn lock(&self, dir: &str) -> Result<LockGuard> {
        let name = sentinel_name(dir);

        if self.client.supports_put_if_absent() {
            match self.client.put_if_absent(&name, Bytes::new()).await {
                Ok(true) => {}
                Ok(false) => return Err(DatastoreError::AlreadyLocked { name }),
                Err(err) => {
                    return Err(DatastoreError::WriteFailed { name, source: err });
                }
            }
        } else {
            match self.locked(dir).await {
                Ok(false) => {}
                Ok(true) | Err(_) => return Err(DatastoreError::AlreadyLocked { name }),
            }
            self.client
                .put(&name, Bytes::new())
                .await
                .map_err(|source| DatastoreError::WriteFailed {
                    name: name.clone(),
                    source,
                })?;
        }

        debug!(name = %name, "lock acquired");
        Ok(LockGuard {
            client: Arc::clone(&self.client),
            name,
            released: AtomicBool::new(false),
        })
    }
}

/// Closer for an acquired lock.
pub struct LockGuard {
    client: Arc<dyn ObjectClient>,
    name: String,
    released: AtomicBool,
}

impl LockGuard {
    /// Object name of the sentinel this guard owns.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove the sentinel, unlocking the repository.
    ///
    /// Release is attempted at most once; further calls are no-ops. A
    /// missing sentinel means the repository is already unlocked and is not
    /// an error.
    pub async fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        match self.client.delete(&self.name).await {
            Ok(()) => {
                debug!(name = %self.name, "lock released");
                Ok(())
            }
            Err(err) if err.is_no_such_key() => Ok(()),
            Err(err) => Err(DatastoreError::DeleteFailed {
                name: self.name.clone(),
                source: err,
            }),
        }
    }

    /// Opt-in process-exit safety net.
    ///
    /// Spawns a task that waits for Ctrl-C (and SIGTERM on Unix), releases
    /// the lock exactly once -- logging but not escalating any failure --
    /// and then terminates the process. Nothing is registered unless this
    /// is called, so tests can lock without touching process signal state.
    pub fn spawn_exit_cleanup(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            wait_for_termination().await;
            if let Err(err) = self.release().await {
                warn!(name = %self.name, error = %err, "failed to remove lock sentinel at shutdown");
            }
            std::process::exit(0);
        })
    }
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
