//! Remote object store backend.
//!
//! Adapter over the `object_store` crate for S3-compatible endpoints.
//! Marker pagination is realized with `list_with_offset`, and conditional
//! creation with `PutMode::Create`, so the adapter advertises the
//! `put_if_absent` capability.
//!
//! Bucket administration (`put_bucket` / `use_bucket`) is not part of the
//! S3-compatible data plane and reports `Unsupported`; provision buckets
//! out of band.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{ClientOptions, ObjectStore, PutMode};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::traits::ObjectClient;
use crate::types::{BucketOptions, GetResponse, ListPage, ListRequest, ObjectInfo};

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Connection options for an S3-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Bucket addressed by the client. Mandatory.
    pub bucket: String,
    /// Endpoint URL for S3-compatible services. `None` targets AWS proper.
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    /// Allow plain-HTTP endpoints (local stacks, MinIO).
    #[serde(default)]
    pub allow_http: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ConnectOptions {
    /// Options for `bucket` with every other field defaulted.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: None,
            region: None,
            access_key_id: None,
            access_key_secret: None,
            allow_http: false,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// `ObjectClient` over an S3-compatible remote store.
pub struct RemoteClient {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
}

impl RemoteClient {
    /// Build a client from connection options.
    pub fn connect(options: &ConnectOptions) -> ClientResult<Self> {
        if options.bucket.trim().is_empty() {
            return Err(ClientError::Transport(
                "connection options require a bucket name".to_string(),
            ));
        }

        let mut builder = AmazonS3Builder::new().with_bucket_name(&options.bucket);

        // Always set a region, even for S3-compatible endpoints.
        let region = options.region.as_deref().unwrap_or("us-east-1");
        builder = builder.with_region(region);

        if let Some(endpoint) = &options.endpoint {
            builder = builder.with_endpoint(endpoint);
            // Path-style requests for custom endpoints like MinIO.
            builder = builder.with_virtual_hosted_style_request(false);
        }

        if options.allow_http {
            builder = builder.with_allow_http(true);
        }

        if let Some(ak) = &options.access_key_id {
            builder = builder.with_access_key_id(ak);
        }
        if let Some(sk) = &options.access_key_secret {
            builder = builder.with_secret_access_key(sk);
        }

        let client_options = ClientOptions::new()
            .with_timeout(Duration::from_secs(options.request_timeout_secs))
            .with_connect_timeout(Duration::from_secs(options.connect_timeout_secs));
        builder = builder.with_client_options(client_options);

        let store = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("S3: {e}")))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: options.bucket.clone(),
        })
    }

    /// Wrap an existing `object_store` instance addressing `bucket`.
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            inner: store,
            bucket: bucket.into(),
        }
    }

    fn map_err(name: &str, err: object_store::Error) -> ClientError {
        match err {
            object_store::Error::NotFound { .. } => ClientError::NoSuchKey {
                name: name.to_string(),
            },
            other => ClientError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl ObjectClient for RemoteClient {
    async fn put(&self, name: &str, bytes: Bytes) -> ClientResult<()> {
        let path = ObjectPath::from(name);
        self.inner
            .put(&path, bytes.into())
            .await
            .map(|_| ())
            .map_err(|e| Self::map_err(name, e))
    }

    async fn get(&self, name: &str) -> ClientResult<GetResponse> {
        let path = ObjectPath::from(name);
        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| Self::map_err(name, e))?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| Self::map_err(name, e))?;
        Ok(GetResponse::new(bytes))
    }

    async fn head(&self, name: &str) -> ClientResult<ObjectInfo> {
        let path = ObjectPath::from(name);
        let meta = self
            .inner
            .head(&path)
            .await
            .map_err(|e| Self::map_err(name, e))?;
        Ok(ObjectInfo {
            name: meta.location.to_string(),
            size_bytes: meta.size,
            modified_timestamp_ms: meta.last_modified.timestamp_millis(),
        })
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        let path = ObjectPath::from(name);
        self.inner
            .delete(&path)
            .await
            .map_err(|e| Self::map_err(name, e))
    }

    async fn list(&self, request: ListRequest) -> ClientResult<ListPage> {
        let prefix = (!request.prefix.is_empty()).then(|| ObjectPath::from(request.prefix.as_str()));

        let mut stream = match &request.marker {
            Some(marker) => self
                .inner
                .list_with_offset(prefix.as_ref(), &ObjectPath::from(marker.as_str())),
            None => self.inner.list(prefix.as_ref()),
        };

        let mut objects = Vec::new();
        let mut is_truncated = false;
        while let Some(item) = stream.next().await {
            let meta = item.map_err(|e| Self::map_err(&request.prefix, e))?;
            if objects.len() == request.max_keys {
                is_truncated = true;
                break;
            }
            objects.push(ObjectInfo {
                name: meta.location.to_string(),
                size_bytes: meta.size,
                modified_timestamp_ms: meta.last_modified.timestamp_millis(),
            });
        }

        let next_marker = if is_truncated {
            objects.last().map(|o| o.name.clone())
        } else {
            None
        };

        Ok(ListPage {
            objects,
            is_truncated,
            next_marker,
        })
    }

    async fn put_bucket(&self, _bucket: &str, _options: &BucketOptions) -> ClientResult<()> {
        Err(ClientError::Unsupported("bucket creation"))
    }

    async fn use_bucket(&self, _bucket: &str) -> ClientResult<()> {
        Err(ClientError::Unsupported("bucket switching"))
    }

    fn bucket(&self) -> String {
        self.bucket.clone()
    }

    fn supports_put_if_absent(&self) -> bool {
        true
    }

    async fn put_if_absent(&self, name: &str, bytes: Bytes) -> ClientResult<bool> {
        let path = ObjectPath::from(name);
        match self.inner.put_opts(&path, bytes.into(), PutMode::Create.into()).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::AlreadyExists { .. }) => Ok(false),
            Err(e) => Err(Self::map_err(name, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_requires_bucket() {
        let options = ConnectOptions::for_bucket("");
        assert!(RemoteClient::connect(&options).is_err());
    }

    #[test]
    fn test_connect_options_defaults() {
        let options = ConnectOptions::for_bucket("repo");
        assert_eq!(options.bucket, "repo");
        assert_eq!(options.request_timeout_secs, 60);
        assert_eq!(options.connect_timeout_secs, 10);
        assert!(!options.allow_http);
    }
}
