//! Datastore configuration.
//!
//! A datastore is backed either by a caller-supplied client instance or by
//! connection options from which a remote client is built. Exactly one of
//! the two must be supplied.

use std::sync::Arc;

use makhzan_client::{ConnectOptions, ObjectClient, RemoteClient};

use crate::datastore::ObjectDatastore;
use crate::error::{DatastoreError, Result};

/// Configuration for [`ObjectDatastore`].
pub struct DatastoreConfig {
    /// Store-relative root path all keys are mapped under.
    pub root: String,
    /// Auto-create the backing bucket on the first write that finds it
    /// missing.
    pub create_if_missing: bool,
    /// Existing client instance to use.
    pub client: Option<Arc<dyn ObjectClient>>,
    /// Connection options to build a remote client from.
    pub connect: Option<ConnectOptions>,
}

impl DatastoreConfig {
    /// Configuration over an existing client instance.
    pub fn with_client(root: impl Into<String>, client: Arc<dyn ObjectClient>) -> Self {
        Self {
            root: root.into(),
            create_if_missing: false,
            client: Some(client),
            connect: None,
        }
    }

    /// Configuration from remote connection options.
    pub fn with_connect(root: impl Into<String>, connect: ConnectOptions) -> Self {
        Self {
            root: root.into(),
            create_if_missing: false,
            client: None,
            connect: Some(connect),
        }
    }

    /// Enable or disable bucket auto-creation.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Validate the configuration and build the datastore.
    pub fn build(self) -> Result<ObjectDatastore> {
        let client: Arc<dyn ObjectClient> = match (self.client, self.connect) {
            (Some(client), None) => client,
            (None, Some(connect)) => {
                if connect.bucket.trim().is_empty() {
                    return Err(DatastoreError::Config(
                        "connection options require a bucket name".to_string(),
                    ));
                }
                Arc::new(
                    RemoteClient::connect(&connect)
                        .map_err(|e| DatastoreError::Config(e.to_string()))?,
                )
            }
            (Some(_), Some(_)) => {
                return Err(DatastoreError::Config(
                    "supply either a client instance or connection options, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(DatastoreError::Config(
                    "either a client instance or connection options are required".to_string(),
                ))
            }
        };

        Ok(ObjectDatastore::new(
            client,
            &self.root,
            self.create_if_missing,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makhzan_client::MemoryClient;

    #[test]
    fn test_build_with_client() {
        let client = Arc::new(MemoryClient::new("repo"));
        let store = DatastoreConfig::with_client("/blocks/", client)
            .create_if_missing(true)
            .build()
            .unwrap();
        assert_eq!(store.root(), "blocks");
    }

    #[test]
    fn test_build_without_backing_is_config_error() {
        let config = DatastoreConfig {
            root: "blocks".to_string(),
            create_if_missing: false,
            client: None,
            connect: None,
        };
        let err = config.build().unwrap_err();
        assert!(matches!(err, DatastoreError::Config(_)));
    }

    #[test]
    fn test_build_with_both_sources_is_config_error() {
        let client: Arc<dyn ObjectClient> = Arc::new(MemoryClient::new("repo"));
        let config = DatastoreConfig {
            root: "blocks".to_string(),
            create_if_missing: false,
            client: Some(client),
            connect: Some(ConnectOptions::for_bucket("repo")),
        };
        let err = config.build().unwrap_err();
        assert!(matches!(err, DatastoreError::Config(_)));
    }

    #[test]
    fn test_build_with_empty_bucket_is_config_error() {
        let config = DatastoreConfig::with_connect("blocks", ConnectOptions::for_bucket("  "));
        let err = config.build().unwrap_err();
        assert!(matches!(err, DatastoreError::Config(_)));
    }
}
