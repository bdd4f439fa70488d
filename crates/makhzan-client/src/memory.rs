//! In-memory object store backend.
//!
//! A `BTreeMap`-backed client for tests and embedding. Listing walks the
//! ordered map, so marker pagination behaves exactly like a remote bucket
//! listing: name order, exclusive marker, truncation flag.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{ClientError, ClientResult};
use crate::traits::ObjectClient;
use crate::types::{BucketOptions, GetResponse, ListPage, ListRequest, ObjectInfo};

#[derive(Debug, Clone)]
struct Stored {
    bytes: Bytes,
    modified_timestamp_ms: i64,
}

/// In-memory `ObjectClient` implementation.
pub struct MemoryClient {
    buckets: RwLock<HashMap<String, BTreeMap<String, Stored>>>,
    active: RwLock<String>,
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn poisoned() -> ClientError {
    ClientError::Transport("memory client lock poisoned".to_string())
}

impl MemoryClient {
    /// Create a client with `bucket` already present and active.
    pub fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let mut buckets = HashMap::new();
        buckets.insert(bucket.clone(), BTreeMap::new());
        Self {
            buckets: RwLock::new(buckets),
            active: RwLock::new(bucket),
        }
    }

    /// Create a client whose active bucket does not exist yet.
    ///
    /// Every write fails with `NoSuchBucket` until the bucket is created,
    /// which is what auto-creating callers need to exercise.
    pub fn with_missing_bucket(bucket: impl Into<String>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            active: RwLock::new(bucket.into()),
        }
    }

    /// Whether `bucket` exists.
    pub fn contains_bucket(&self, bucket: &str) -> bool {
        self.buckets
            .read()
            .map(|b| b.contains_key(bucket))
            .unwrap_or(false)
    }

    /// Number of objects in the active bucket (0 if it does not exist).
    pub fn object_count(&self) -> usize {
        let active = match self.active.read() {
            Ok(a) => a.clone(),
            Err(_) => return 0,
        };
        self.buckets
            .read()
            .map(|b| b.get(&active).map(|m| m.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    fn active_bucket(&self) -> ClientResult<String> {
        Ok(self.active.read().map_err(|_| poisoned())?.clone())
    }
}

#[async_trait]
impl ObjectClient for MemoryClient {
    async fn put(&self, name: &str, bytes: Bytes) -> ClientResult<()> {
        let active = self.active_bucket()?;
        let mut buckets = self.buckets.write().map_err(|_| poisoned())?;
        let objects = buckets
            .get_mut(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;
        objects.insert(
            name.to_string(),
            Stored {
                bytes,
                modified_timestamp_ms: now_ms(),
            },
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> ClientResult<GetResponse> {
        let active = self.active_bucket()?;
        let buckets = self.buckets.read().map_err(|_| poisoned())?;
        let objects = buckets
            .get(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;
        let stored = objects.get(name).ok_or_else(|| ClientError::NoSuchKey {
            name: name.to_string(),
        })?;
        Ok(GetResponse::new(stored.bytes.clone()))
    }

    async fn head(&self, name: &str) -> ClientResult<ObjectInfo> {
        let active = self.active_bucket()?;
        let buckets = self.buckets.read().map_err(|_| poisoned())?;
        let objects = buckets
            .get(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;
        let stored = objects.get(name).ok_or_else(|| ClientError::NoSuchKey {
            name: name.to_string(),
        })?;
        Ok(ObjectInfo {
            name: name.to_string(),
            size_bytes: stored.bytes.len() as u64,
            modified_timestamp_ms: stored.modified_timestamp_ms,
        })
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        let active = self.active_bucket()?;
        let mut buckets = self.buckets.write().map_err(|_| poisoned())?;
        let objects = buckets
            .get_mut(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;
        match objects.remove(name) {
            Some(_) => Ok(()),
            None => Err(ClientError::NoSuchKey {
                name: name.to_string(),
            }),
        }
    }

    async fn list(&self, request: ListRequest) -> ClientResult<ListPage> {
        let active = self.active_bucket()?;
        let buckets = self.buckets.read().map_err(|_| poisoned())?;
        let objects = buckets
            .get(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;

        // Marker is exclusive: resume strictly after it.
        let start = match &request.marker {
            Some(marker) => Bound::Excluded(marker.clone()),
            None => Bound::Unbounded,
        };

        let mut page = Vec::new();
        let mut is_truncated = false;
        for (name, stored) in objects.range((start, Bound::Unbounded)) {
            if !name.starts_with(&request.prefix) {
                // Names are ordered, so once past the prefix range nothing
                // further can match.
                if name.as_str() > request.prefix.as_str() && !request.prefix.is_empty() {
                    break;
                }
                continue;
            }
            if page.len() == request.max_keys {
                is_truncated = true;
                break;
            }
            page.push(ObjectInfo {
                name: name.clone(),
                size_bytes: stored.bytes.len() as u64,
                modified_timestamp_ms: stored.modified_timestamp_ms,
            });
        }

        let next_marker = if is_truncated {
            page.last().map(|o| o.name.clone())
        } else {
            None
        };

        Ok(ListPage {
            objects: page,
            is_truncated,
            next_marker,
        })
    }

    async fn put_bucket(&self, bucket: &str, _options: &BucketOptions) -> ClientResult<()> {
        let mut buckets = self.buckets.write().map_err(|_| poisoned())?;
        buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn use_bucket(&self, bucket: &str) -> ClientResult<()> {
        let buckets = self.buckets.read().map_err(|_| poisoned())?;
        if !buckets.contains_key(bucket) {
            return Err(ClientError::NoSuchBucket {
                bucket: bucket.to_string(),
            });
        }
        drop(buckets);
        *self.active.write().map_err(|_| poisoned())? = bucket.to_string();
        Ok(())
    }

    fn bucket(&self) -> String {
        self.active
            .read()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    fn supports_put_if_absent(&self) -> bool {
        true
    }

    async fn put_if_absent(&self, name: &str, bytes: Bytes) -> ClientResult<bool> {
        let active = self.active_bucket()?;
        let mut buckets = self.buckets.write().map_err(|_| poisoned())?;
        let objects = buckets
            .get_mut(&active)
            .ok_or(ClientError::NoSuchBucket { bucket: active })?;
        if objects.contains_key(name) {
            return Ok(false);
        }
        objects.insert(
            name.to_string(),
            Stored {
                bytes,
                modified_timestamp_ms: now_ms(),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let client = MemoryClient::new("test-bucket");
        client
            .put("data/a", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let response = client.get("data/a").await.unwrap();
        assert_eq!(response.content, Some(Bytes::from_static(b"hello")));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let client = MemoryClient::new("test-bucket");
        let err = client.get("data/missing").await.unwrap_err();
        assert!(err.is_no_such_key());
    }

    #[tokio::test]
    async fn test_put_into_missing_bucket() {
        let client = MemoryClient::with_missing_bucket("ghost");
        let err = client.put("data/a", Bytes::new()).await.unwrap_err();
        assert!(err.is_no_such_bucket());
    }

    #[tokio::test]
    async fn test_bucket_creation_and_switch() {
        let client = MemoryClient::with_missing_bucket("ghost");
        client
            .put_bucket("ghost", &BucketOptions::default())
            .await
            .unwrap();
        client.use_bucket("ghost").await.unwrap();
        client.put("data/a", Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(client.object_count(), 1);
    }

    #[tokio::test]
    async fn test_list_pagination_with_marker() {
        let client = MemoryClient::new("test-bucket");
        for i in 0..10 {
            client
                .put(&format!("data/k{i:02}"), Bytes::from_static(b"v"))
                .await
                .unwrap();
        }

        let first = client
            .list(ListRequest {
                prefix: "data/".to_string(),
                max_keys: 4,
                marker: None,
            })
            .await
            .unwrap();
        assert_eq!(first.objects.len(), 4);
        assert!(first.is_truncated);
        assert_eq!(first.next_marker.as_deref(), Some("data/k03"));

        let second = client
            .list(ListRequest {
                prefix: "data/".to_string(),
                max_keys: 100,
                marker: first.next_marker,
            })
            .await
            .unwrap();
        assert_eq!(second.objects.len(), 6);
        assert!(!second.is_truncated);
        assert_eq!(second.next_marker, None);
        assert_eq!(second.objects[0].name, "data/k04");
    }

    #[tokio::test]
    async fn test_list_prefix_filtering() {
        let client = MemoryClient::new("test-bucket");
        client.put("data/a", Bytes::from_static(b"v")).await.unwrap();
        client.put("other/b", Bytes::from_static(b"v")).await.unwrap();

        let page = client
            .list(ListRequest {
                prefix: "data/".to_string(),
                max_keys: 100,
                marker: None,
            })
            .await
            .unwrap();
        assert_eq!(page.objects.len(), 1);
        assert_eq!(page.objects[0].name, "data/a");
    }

    #[tokio::test]
    async fn test_put_if_absent() {
        let client = MemoryClient::new("test-bucket");
        assert!(client.supports_put_if_absent());

        let created = client.put_if_absent("repo.lock", Bytes::new()).await.unwrap();
        assert!(created);

        let created_again = client.put_if_absent("repo.lock", Bytes::new()).await.unwrap();
        assert!(!created_again);
    }

    #[tokio::test]
    async fn test_delete_missing_key_reports_absence() {
        let client = MemoryClient::new("test-bucket");
        let err = client.delete("data/missing").await.unwrap_err();
        assert!(err.is_no_such_key());
    }
}
