//! Object store client abstraction.
//!
//! All backends implement the same `ObjectClient` trait; callers hold an
//! `Arc<dyn ObjectClient>` and stay backend-agnostic. Implementations must be
//! thread-safe and are expected to perform their own retry and timeout
//! handling; the datastore layered on top performs no internal retries.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{ClientError, ClientResult};
use crate::types::{BucketOptions, GetResponse, ListPage, ListRequest, ObjectInfo};

/// Minimal capability surface of a remote object store.
///
/// ## Error Handling
///
/// Implementations must report absence with [`ClientError::NoSuchKey`] /
/// [`ClientError::NoSuchBucket`] (or an `Api` error carrying the matching
/// code) so callers can downgrade it to a non-exceptional outcome. All other
/// failures are propagated as-is.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Write `bytes` under `name`, replacing any existing object.
    async fn put(&self, name: &str, bytes: Bytes) -> ClientResult<()>;

    /// Read the object stored under `name`.
    async fn get(&self, name: &str) -> ClientResult<GetResponse>;

    /// Metadata-only existence probe for `name`.
    async fn head(&self, name: &str) -> ClientResult<ObjectInfo>;

    /// Remove the object stored under `name`.
    async fn delete(&self, name: &str) -> ClientResult<()>;

    /// Fetch one page of the bucket listing.
    ///
    /// Pages are name-ordered. When `is_truncated` is set the next page
    /// resumes from `next_marker` (or, if the backend omitted it, from the
    /// last name in the page).
    async fn list(&self, request: ListRequest) -> ClientResult<ListPage>;

    /// Create a bucket. Returns `Ok(())` if it already exists (idempotent).
    async fn put_bucket(&self, bucket: &str, options: &BucketOptions) -> ClientResult<()>;

    /// Switch subsequent operations to address `bucket`.
    async fn use_bucket(&self, bucket: &str) -> ClientResult<()>;

    /// Name of the bucket operations currently address.
    fn bucket(&self) -> String;

    /// Whether [`ObjectClient::put_if_absent`] is implemented.
    ///
    /// Conditional creation closes the check-then-create race that plain
    /// put-based locking is exposed to; backends advertise it here instead
    /// of callers assuming it.
    fn supports_put_if_absent(&self) -> bool {
        false
    }

    /// Create `name` only if no object exists there yet.
    ///
    /// Returns `Ok(true)` when the object was created and `Ok(false)` when
    /// an object was already present.
    async fn put_if_absent(&self, _name: &str, _bytes: Bytes) -> ClientResult<bool> {
        Err(ClientError::Unsupported("conditional put"))
    }
}
