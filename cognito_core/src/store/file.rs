use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{SettingsStore, StoreError, StoreFailure};
use crate::properties::{ConnectorProperties, ConnectorRecord};

type ConnectorMap = BTreeMap<String, ConnectorProperties>;

/// A file-backed JSON store at `~/.config/cognito_connector/settings.json` (Unix)
/// or `%APPDATA%/cognito_connector/settings.json` (Windows).
///
/// The document maps connector service names to their property bags. The
/// document is a few hundred bytes, so reads and writes are plain synchronous
/// file calls.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn new_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("cognito_connector").join("settings.json")
    }

    pub fn config_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<ConnectorMap, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(ConnectorMap::new()),
            Ok(s) => serde_json::from_str(&s).map_err(|e| {
                StoreError::Unavailable(format!("{} is not valid JSON: {}", self.config_path(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConnectorMap::new()),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn write_map(&self, map: &ConnectorMap) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Persist(e.to_string()))?;
        }
        let s = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Persist(format!("serde: {}", e)))?;
        let mut file = Self::open_private(&self.path)
            .map_err(|e| StoreError::Persist(format!("{}: {}", self.config_path(), e)))?;
        file.write_all(s.as_bytes())
            .map_err(|e| StoreError::Persist(e.to_string()))?;

        Ok(())
    }

    /// Open for writing, owner read/write only: the bag holds client secrets.
    /// A new file is created with 0600; an existing one is narrowed before
    /// it is truncated and rewritten.
    #[cfg(unix)]
    fn open_private(path: &Path) -> std::io::Result<File> {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(path)?;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.set_len(0)?;
        Ok(file)
    }

    #[cfg(not(unix))]
    fn open_private(path: &Path) -> std::io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }

    pub fn list_connectors(&self) -> Result<Vec<String>, StoreFailure> {
        Ok(self.read_map()?.into_keys().collect())
    }

    /// Drop a connector's settings. Returns whether anything was stored.
    pub fn remove(&self, connector_service_name: &str) -> Result<bool, StoreFailure> {
        let mut map = self.read_map()?;
        if map.remove(connector_service_name).is_none() {
            return Ok(false);
        }
        self.write_map(&map)?;
        Ok(true)
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        let map = self.read_map()?;
        let mut found = map.get(connector_service_name).cloned().unwrap_or_default();
        found.retain_requested(properties);
        debug!(
            connector = connector_service_name,
            path = %self.config_path(),
            found = found.len(),
            "read connector settings from file"
        );
        Ok(found)
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        let mut map = self.read_map()?;
        map.insert(
            record.connector_service_name.clone(),
            record.properties.clone(),
        );
        self.write_map(&map)?;
        debug!(
            connector = %record.connector_service_name,
            path = %self.config_path(),
            "wrote connector settings to file"
        );
        Ok(())
    }
}
