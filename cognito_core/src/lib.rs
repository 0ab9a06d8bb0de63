// src/lib.rs
pub mod error;
pub mod form;
pub mod i18n;
pub mod notify;
pub mod properties;
pub mod router;
pub mod schema;
pub mod store;

/// Connector service name under which the Cognito settings are persisted.
///
/// Must match the service name registered by the OAuth connector on the
/// backend, otherwise reads come back empty.
pub const CONNECTOR_SERVICE_NAME: &str = "AwsCognitoApi20";

/// Namespace of the connector's message bundle. Shares the service name.
pub const I18N_NAMESPACE: &str = CONNECTOR_SERVICE_NAME;

pub use crate::error::SettingsError;
pub use crate::form::{ConnectorSettingsForm, FormPhase, FormViewState};
pub use crate::i18n::{BundleRegistry, I18n, MessageBundle};
pub use crate::notify::{Notifier, RecordingNotifier, Toast, TracingNotifier};
pub use crate::properties::{ConnectorProperties, ConnectorRecord, PropertyValue};
pub use crate::router::{LoggingRouter, RecordingRouter, Router};
pub use crate::schema::{ConnectorConfigSchema, SchemaRevision};
pub use crate::store::{
    FileSettingsStore, HttpSettingsStore, MemorySettingsStore, SettingsStore, SiteScopedStore,
    StoreFailure,
};
