// src/store/mod.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::properties::{ConnectorProperties, ConnectorRecord};

mod file;
mod http;
mod memory;
mod site;

pub use file::FileSettingsStore;
pub use http::{HttpSettingsStore, HttpStoreOptions};
pub use memory::MemorySettingsStore;
pub use site::{site_scoped_name, SiteScopedStore, SYSTEM_SITE_KEY};

/// Failure payload returned by the settings backend.
///
/// Network, authorization and backend validation failures all land here;
/// `error` is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFailure {
    pub error: String,
}

impl StoreFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for StoreFailure {}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("persist error: {0}")]
    Persist(String),
}

impl From<StoreError> for StoreFailure {
    fn from(err: StoreError) -> Self {
        StoreFailure::new(err.to_string())
    }
}

/// Settings persistence backend, addressed by connector service name.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the requested properties of a connector.
    ///
    /// An unconfigured connector yields an empty map, not an error.
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure>;

    /// Persist a connector's property bag, replacing what was stored.
    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure>;
}

#[async_trait]
impl<S: SettingsStore + ?Sized> SettingsStore for std::sync::Arc<S> {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        (**self).read(connector_service_name, properties).await
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        (**self).write(record).await
    }
}

#[async_trait]
impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        (**self).read(connector_service_name, properties).await
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        (**self).write(record).await
    }
}
