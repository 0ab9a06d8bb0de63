use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{SettingsStore, StoreError, StoreFailure};
use crate::properties::{ConnectorProperties, ConnectorRecord};

/// A simple in-memory store, mainly for testing.
///
/// Counts calls and can be primed to fail, so tests can assert that
/// validation short-circuits before any write.
#[derive(Default)]
pub struct MemorySettingsStore {
    map: Mutex<HashMap<String, ConnectorProperties>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_read: Mutex<Option<StoreFailure>>,
    fail_write: Mutex<Option<StoreFailure>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a stored connector.
    pub fn with_connector(name: &str, properties: ConnectorProperties) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.map.lock() {
            map.insert(name.to_string(), properties);
        }
        store
    }

    pub fn fail_reads_with(&self, error: &str) {
        if let Ok(mut slot) = self.fail_read.lock() {
            *slot = Some(StoreFailure::new(error));
        }
    }

    pub fn fail_writes_with(&self, error: &str) {
        if let Ok(mut slot) = self.fail_write.lock() {
            *slot = Some(StoreFailure::new(error));
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut slot) = self.fail_read.lock() {
            *slot = None;
        }
        if let Ok(mut slot) = self.fail_write.lock() {
            *slot = None;
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of what is stored for a connector.
    pub fn stored(&self, name: &str) -> Option<ConnectorProperties> {
        self.map.lock().ok()?.get(name).cloned()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.fail_read.lock().ok().and_then(|f| f.clone()) {
            return Err(failure);
        }
        let map = self
            .map
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))?;
        let mut found = map.get(connector_service_name).cloned().unwrap_or_default();
        found.retain_requested(properties);
        Ok(found)
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.fail_write.lock().ok().and_then(|f| f.clone()) {
            return Err(failure);
        }
        self.map
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))?
            .insert(
                record.connector_service_name.clone(),
                record.properties.clone(),
            );
        Ok(())
    }
}
