use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{SettingsStore, StoreFailure};
use crate::error::SettingsError;
use crate::properties::{ConnectorProperties, ConnectorRecord};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HttpStoreOptions {
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpStoreOptions {
    fn default() -> Self {
        Self {
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Settings backend reached over HTTP.
///
/// - read: `POST {base}/connectors/{name}/read` with `{"properties": [...]}`
/// - write: `POST {base}/connectors/{name}` with the [`ConnectorRecord`]
///
/// Non-2xx answers carry `{"error": "..."}`. A write succeeds on any 2xx,
/// whatever the body.
pub struct HttpSettingsStore {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpSettingsStore {
    pub fn new(base_url: &str, options: HttpStoreOptions) -> Result<Self, SettingsError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| SettingsError::Config(format!("invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SettingsError::Config(format!(
                "backend URL '{}' cannot be used as a base",
                base_url
            )));
        }
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            bearer_token: options.bearer_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn write_url(&self, connector_service_name: &str) -> Result<Url, StoreFailure> {
        let segment = format!("connectors/{}", urlencoding::encode(connector_service_name));
        self.base_url
            .join(&segment)
            .map_err(|e| StoreFailure::new(format!("invalid connector URL: {}", e)))
    }

    pub fn read_url(&self, connector_service_name: &str) -> Result<Url, StoreFailure> {
        let segment = format!(
            "connectors/{}/read",
            urlencoding::encode(connector_service_name)
        );
        self.base_url
            .join(&segment)
            .map_err(|e| StoreFailure::new(format!("invalid connector URL: {}", e)))
    }

    /// Send the request and return the body of a 2xx answer.
    async fn post(&self, url: Url, body: &Value) -> Result<String, StoreFailure> {
        let mut request = self.client.post(url.clone()).json(body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| StoreFailure::new(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| StoreFailure::new(e.to_string()))?;
        if !status.is_success() {
            warn!(%url, %status, "settings backend rejected request");
            return Err(failure_from_body(status.as_u16(), &text));
        }
        Ok(text)
    }
}

/// Extract the backend's `error` field, falling back to the status line.
pub(crate) fn failure_from_body(status: u16, body: &str) -> StoreFailure {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    match from_json {
        Some(error) => StoreFailure::new(error),
        None if body.trim().is_empty() => StoreFailure::new(format!("HTTP {}", status)),
        None => StoreFailure::new(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Turn a read response into properties; `null` and `{}` both mean unconfigured.
pub(crate) fn properties_from_response(value: Value) -> Result<ConnectorProperties, StoreFailure> {
    match value {
        Value::Null => Ok(ConnectorProperties::new()),
        Value::Object(map) => Ok(ConnectorProperties::from_json_object(map)),
        other => Err(StoreFailure::new(format!(
            "expected a JSON object from the backend, got {}",
            other
        ))),
    }
}

#[async_trait]
impl SettingsStore for HttpSettingsStore {
    async fn read(
        &self,
        connector_service_name: &str,
        properties: &[&str],
    ) -> Result<ConnectorProperties, StoreFailure> {
        let url = self.read_url(connector_service_name)?;
        debug!(%url, count = properties.len(), "reading connector settings");
        let text = self.post(url, &json!({ "properties": properties })).await?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| StoreFailure::new(format!("invalid backend response: {}", e)))?
        };
        let mut found = properties_from_response(value)?;
        found.retain_requested(properties);
        Ok(found)
    }

    async fn write(&self, record: &ConnectorRecord) -> Result<(), StoreFailure> {
        let url = self.write_url(&record.connector_service_name)?;
        debug!(%url, count = record.properties.len(), "writing connector settings");
        let body = serde_json::to_value(record).map_err(|e| StoreFailure::new(e.to_string()))?;
        // Any 2xx is an acknowledgement; the body is not interpreted.
        self.post(url, &body).await?;
        Ok(())
    }
}
