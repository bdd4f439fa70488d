//! Request and response value types for object store operations.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Result of a get (read) operation.
///
/// `content` is optional so callers can detect a backend that answered with
/// success but shipped no body, which well-behaved backends never do.
#[derive(Debug, Clone)]
pub struct GetResponse {
    /// Object contents as bytes, if the backend shipped any.
    pub content: Option<Bytes>,
}

impl GetResponse {
    /// Create a response carrying the given content.
    pub fn new(content: Bytes) -> Self {
        Self {
            content: Some(content),
        }
    }
}

/// Metadata for a stored object (size, modification time).
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Full object name within the bucket.
    pub name: String,
    /// Object size in bytes.
    pub size_bytes: u64,
    /// Last modification time in milliseconds since the Unix epoch.
    pub modified_timestamp_ms: i64,
}

/// A single page request against a bucket listing.
#[derive(Debug, Clone)]
pub struct ListRequest {
    /// Only names starting with this prefix are returned. Empty matches all.
    pub prefix: String,
    /// Maximum number of objects per page.
    pub max_keys: usize,
    /// Resume listing strictly after this name. `None` starts from the top.
    pub marker: Option<String>,
}

/// One page of a bucket listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Objects in this page, in name order.
    pub objects: Vec<ObjectInfo>,
    /// Whether more objects remain beyond this page.
    pub is_truncated: bool,
    /// Continuation cursor for the next page. Backends may omit it even when
    /// `is_truncated` is set; callers then resume from the last name observed.
    pub next_marker: Option<String>,
}

/// Storage class for newly created buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    Standard,
    InfrequentAccess,
    Archive,
}

/// Access policy for newly created buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketAcl {
    Private,
    PublicRead,
    PublicReadWrite,
}

/// Durability model for newly created buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRedundancy {
    LocallyRedundant,
    ZoneRedundant,
}

/// Options applied when creating a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketOptions {
    pub storage_class: StorageClass,
    pub acl: BucketAcl,
    pub data_redundancy: DataRedundancy,
    /// Creation timeout in seconds. Bucket creation is slow on most backends.
    pub timeout_secs: u64,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            storage_class: StorageClass::Standard,
            acl: BucketAcl::PublicRead,
            data_redundancy: DataRedundancy::LocallyRedundant,
            timeout_secs: 120,
        }
    }
}
