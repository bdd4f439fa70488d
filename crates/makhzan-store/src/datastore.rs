//! CRUD engine over an object store client.

use std::sync::Arc;

use bytes::Bytes;
use makhzan_client::{BucketOptions, ObjectClient};
use tracing::{debug, warn};

use crate::batch::Batch;
use crate::error::{DatastoreError, Result};
use crate::keys::Key;
use crate::paths::{normalize_root, object_name};

/// Key-value datastore mapping abstract keys onto objects under a root path.
///
/// The datastore holds no key state in memory; every operation is a network
/// call against the backing client. Clones share the same client and are
/// cheap.
#[derive(Clone)]
pub struct ObjectDatastore {
    client: Arc<dyn ObjectClient>,
    root: String,
    create_if_missing: bool,
}

impl ObjectDatastore {
    /// Create a datastore over `client`, mapping keys under `root`.
    ///
    /// With `create_if_missing`, a write that fails because the backing
    /// bucket does not exist triggers a one-shot bucket creation so later
    /// writes can succeed.
    pub fn new(client: Arc<dyn ObjectClient>, root: &str, create_if_missing: bool) -> Self {
        Self {
            client,
            root: normalize_root(root),
            create_if_missing,
        }
    }

    /// Normalized root path keys are mapped under.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn client(&self) -> &Arc<dyn ObjectClient> {
        &self.client
    }

    /// Write `value` under `key`, replacing any existing value.
    ///
    /// When the bucket is missing and auto-creation is configured, the
    /// bucket is created with default options as a side effect that benefits
    /// subsequent calls; the original write still reports failure.
    pub async fn put(&self, key: &Key, value: Bytes) -> Result<()> {
        let name = object_name(&self.root, key);
        debug!(key = %key, name = %name, size = value.len(), "datastore put");

        match self.client.put(&name, value).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if self.create_if_missing && err.is_no_such_bucket() {
                    self.create_bucket_best_effort().await;
                }
                Err(DatastoreError::WriteFailed { name, source: err })
            }
        }
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &Key) -> Result<Bytes> {
        let name = object_name(&self.root, key);
        debug!(key = %key, name = %name, "datastore get");

        match self.client.get(&name).await {
            Ok(response) => match response.content {
                Some(bytes) if !bytes.is_empty() => Ok(bytes),
                _ => Err(DatastoreError::ProtocolViolation {
                    detail: format!("backend returned success with no content for '{name}'"),
                }),
            },
            Err(err) if err.is_no_such_key() => Err(DatastoreError::NotFound { key: key.clone() }),
            Err(err) => Err(DatastoreError::Backend {
                op: "get",
                name,
                source: err,
            }),
        }
    }

    /// Metadata-only existence probe for `key`.
    pub async fn has(&self, key: &Key) -> Result<bool> {
        let name = object_name(&self.root, key);

        match self.client.head(&name).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_no_such_key() => Ok(false),
            Err(err) => Err(DatastoreError::Backend {
                op: "head",
                name,
                source: err,
            }),
        }
    }

    /// Remove the value stored under `key`.
    ///
    /// Deleting an absent key is a no-op, so deletes are idempotent. Any
    /// other failure is a delete failure.
    pub async fn delete(&self, key: &Key) -> Result<()> {
        let name = object_name(&self.root, key);
        debug!(key = %key, name = %name, "datastore delete");

        match self.client.delete(&name).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_no_such_key() => Ok(()),
            Err(err) => Err(DatastoreError::DeleteFailed { name, source: err }),
        }
    }

    /// Probe the root path. An absent root is a valid empty store; any other
    /// failure is an open failure.
    pub async fn open(&self) -> Result<()> {
        match self.client.head(&self.root).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_missing() => Ok(()),
            Err(err) => Err(DatastoreError::OpenFailed {
                root: self.root.clone(),
                source: err,
            }),
        }
    }

    /// Release local resources. The client is caller-owned, so this always
    /// succeeds.
    pub async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Start an empty batch against this datastore.
    pub fn batch(&self) -> Batch {
        Batch::new(self.clone())
    }

    async fn create_bucket_best_effort(&self) {
        let bucket = self.client.bucket();
        let options = BucketOptions::default();
        debug!(bucket = %bucket, "auto-creating missing bucket");

        if let Err(err) = self.client.put_bucket(&bucket, &options).await {
            warn!(bucket = %bucket, error = %err, "bucket auto-create failed");
            return;
        }
        if let Err(err) = self.client.use_bucket(&bucket).await {
            warn!(bucket = %bucket, error = %err, "failed to switch to auto-created bucket");
        }
    }
}
