use async_trait::async_trait;
use tracing::debug;

use super::{SettingsStore, StoreFailure};
use crate::properties::{ConnectorProperties, ConnectorRecord};

/// Site whose settings every other site inherits until it saves its own.
pub const SYSTEM_SITE_KEY: &str = "systemsite";

/// Name under which a site's connector settings are stored.
///
/// The system site keeps the bare connector name, so settings written
/// without a site remain the shared fallback.
pub fn site_scoped_name(site_key: &str, connector_service_name: &str) -> String {
    if site_key == SYSTEM_SITE_KEY {
        connector_service_name.to_string()
    } else {
        format!("{}/{}", site_key, connector_service_name)
    }
}

/// Per-site view over another store.
///
/// Reads try the site's own settings first and fall back to the system
/// site when the site has none. Writes always land on the site.
pub struct SiteScopedStore<S> {
    inner: S,
    site_key: String,
}

impl<S: SettingsStore> SiteScopedStore<S> {
    pub fn new(inner: S, site_key: impl Into<String>) -> Self {
        Self {
            inner,
            site_key: site_key.into(),
        }
    }

    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SettingsStore> SettingsStore for SiteScopedStore<S> {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        let scoped = site_scoped_name(&self.site_key, connector_service_name);
        let found = self.inner.read(&scoped, properties).await?;
        if !found.is_empty() || self.site_key == SYSTEM_SITE_KEY {
            return Ok(found);
        }
        debug!(
            site = %self.site_key,
            connector = connector_service_name,
            "no site settings, falling back to the system site"
        );
        self.inner.read(connector_service_name, properties).await
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        let scoped = ConnectorRecord::new(
            site_scoped_name(&self.site_key, &record.connector_service_name),
            record.properties.clone(),
        );
        self.inner.write(&scoped).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySettingsStore;
    use std::sync::Arc;

    fn props(api_key: &str) -> ConnectorProperties {
        let mut props = ConnectorProperties::new();
        props.insert("apiKey", api_key);
        props
    }

    #[test]
    fn test_scoped_names() {
        assert_eq!(site_scoped_name("systemsite", "AwsCognitoApi20"), "AwsCognitoApi20");
        assert_eq!(
            site_scoped_name("digitall", "AwsCognitoApi20"),
            "digitall/AwsCognitoApi20"
        );
    }

    #[tokio::test]
    async fn test_site_falls_back_to_system_site() {
        let inner = Arc::new(MemorySettingsStore::with_connector(
            "AwsCognitoApi20",
            props("shared"),
        ));
        let store = SiteScopedStore::new(inner.clone(), "digitall");

        let read = store.read("AwsCognitoApi20", &["apiKey"]).await.unwrap();
        assert_eq!(read.get_str("apiKey"), Some("shared"));
        assert_eq!(inner.read_count(), 2);
    }

    #[tokio::test]
    async fn test_site_settings_win_and_writes_stay_on_site() {
        let inner = Arc::new(MemorySettingsStore::with_connector(
            "AwsCognitoApi20",
            props("shared"),
        ));
        let store = SiteScopedStore::new(inner.clone(), "digitall");
        store
            .write(&ConnectorRecord::new("AwsCognitoApi20", props("own")))
            .await
            .unwrap();

        let read = store.read("AwsCognitoApi20", &["apiKey"]).await.unwrap();
        assert_eq!(read.get_str("apiKey"), Some("own"));
        assert_eq!(
            inner.stored("AwsCognitoApi20").unwrap().get_str("apiKey"),
            Some("shared")
        );
        assert_eq!(
            inner
                .stored("digitall/AwsCognitoApi20")
                .unwrap()
                .get_str("apiKey"),
            Some("own")
        );
    }

    #[tokio::test]
    async fn test_system_site_reads_once() {
        let inner = Arc::new(MemorySettingsStore::new());
        let store = SiteScopedStore::new(inner.clone(), SYSTEM_SITE_KEY);
        assert!(store.read("AwsCognitoApi20", &["apiKey"]).await.unwrap().is_empty());
        assert_eq!(inner.read_count(), 1);
    }

    #[tokio::test]
    async fn test_site_failure_does_not_fall_back() {
        let inner = Arc::new(MemorySettingsStore::with_connector(
            "AwsCognitoApi20",
            props("shared"),
        ));
        inner.fail_reads_with("backend down");
        let store = SiteScopedStore::new(inner.clone(), "digitall");
        let err = store.read("AwsCognitoApi20", &["apiKey"]).await.unwrap_err();
        assert_eq!(err.error, "backend down");
        assert_eq!(inner.read_count(), 1);
    }
}
