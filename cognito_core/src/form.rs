// src/form.rs
//! Settings form of the Cognito connector.
//!
//! The form owns an explicit [`FormViewState`] and talks to its collaborators
//! only through traits. A load computes the complete next state before
//! assigning it, and a failed save never touches the state, so no failure
//! leaves a half-written view behind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::SettingsError;
use crate::i18n::{I18n, MessageBundle, KEY_MISSING_MANDATORY, KEY_SAVE_SUCCESS, KEY_VIEW_TITLE};
use crate::notify::Notifier;
use crate::properties::{
    parse_string_flag, to_string_flag, ConnectorProperties, ConnectorRecord, PropertyValue,
};
use crate::router::{mappers_path, Router};
use crate::schema::{
    SchemaRevision, API_KEY, API_SECRET, CALLBACK_URL, DEFAULT_API_KEY, DEFAULT_API_SECRET,
    ENABLED, ENDPOINT, LOGIN_URL, LOGOUT_CALLBACK_URL, LOGOUT_ENDPOINT, REGION, SCOPE, SECRET_KEY,
    WITH_CUSTOM_LOGIN,
};
use crate::store::{SettingsStore, StoreFailure};
use crate::CONNECTOR_SERVICE_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Uninitialized,
    Loading,
    Configured,
    Unconfigured,
    Saving,
    /// Last save failed. The form stays editable and save may be retried.
    SaveError,
}

/// Editable state behind the form. Text fields are keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormViewState {
    pub enabled: bool,
    pub expanded_card: bool,
    pub connector_has_settings: bool,
    pub with_custom_login: bool,
    fields: BTreeMap<String, String>,
}

impl FormViewState {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn clear_field(&mut self, name: &str) {
        self.fields.remove(name);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when no text field has been set.
    pub fn fields_unset(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set and non-empty. Whitespace counts as present.
    pub fn is_present(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| !v.is_empty())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.field(API_KEY)
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.field(API_SECRET)
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.field(ENDPOINT)
    }

    pub fn region(&self) -> Option<&str> {
        self.field(REGION)
    }

    pub fn scope(&self) -> Option<&str> {
        self.field(SCOPE)
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.field(CALLBACK_URL)
    }

    pub fn logout_endpoint(&self) -> Option<&str> {
        self.field(LOGOUT_ENDPOINT)
    }

    pub fn logout_callback_url(&self) -> Option<&str> {
        self.field(LOGOUT_CALLBACK_URL)
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.field(SECRET_KEY)
    }

    pub fn login_url(&self) -> Option<&str> {
        self.field(LOGIN_URL)
    }
}

/// Controller binding a [`FormViewState`] to the settings store.
pub struct ConnectorSettingsForm<S, I, N> {
    revision: SchemaRevision,
    store: S,
    i18n: I,
    notifier: N,
    router: Option<Arc<dyn Router>>,
    state: FormViewState,
    phase: FormPhase,
}

impl<S, I, N> ConnectorSettingsForm<S, I, N>
where
    S: SettingsStore,
    I: I18n,
    N: Notifier,
{
    pub fn new(revision: SchemaRevision, store: S, i18n: I, notifier: N) -> Self {
        Self {
            revision,
            store,
            i18n,
            notifier,
            router: None,
            state: FormViewState::default(),
            phase: FormPhase::Uninitialized,
        }
    }

    pub fn with_router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn revision(&self) -> SchemaRevision {
        self.revision
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn state(&self) -> &FormViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormViewState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register the message bundle and load the persisted settings.
    pub async fn activate(&mut self) -> Result<(), SettingsError> {
        self.i18n.add_bundle(&MessageBundle::connector_default());

        let previous = self.phase;
        self.phase = FormPhase::Loading;
        debug!(revision = %self.revision, "loading connector settings");

        let loaded = self
            .store
            .read(CONNECTOR_SERVICE_NAME, self.revision.properties())
            .await;
        match loaded {
            Ok(properties) => {
                let configured = !properties.is_empty();
                self.state = apply_loaded(self.revision, &properties);
                self.phase = if configured {
                    FormPhase::Configured
                } else {
                    FormPhase::Unconfigured
                };
                info!(
                    connector = CONNECTOR_SERVICE_NAME,
                    configured, "connector settings loaded"
                );
                Ok(())
            }
            Err(failure) => {
                warn!(connector = CONNECTOR_SERVICE_NAME, error = %failure, "loading connector settings failed");
                self.phase = previous;
                self.notifier.error_toast(&self.failure_message(&failure));
                Err(SettingsError::Persistence(failure))
            }
        }
    }

    /// Mandatory fields missing for the current custom-login choice.
    pub fn missing_mandatory(&self) -> Vec<String> {
        self.revision
            .mandatory(self.custom_login_active())
            .iter()
            .filter(|name| !self.state.is_present(name))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let missing = self.missing_mandatory();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::MissingMandatoryProperties(missing))
        }
    }

    /// Write payload for the current state: exactly the revision's
    /// properties, with sentinels for an empty client id or secret.
    pub fn build_record(&self) -> ConnectorRecord {
        let mut properties = ConnectorProperties::new();
        for name in self.revision.properties() {
            let value = match *name {
                ENABLED => PropertyValue::Bool(self.state.enabled),
                WITH_CUSTOM_LOGIN => to_string_flag(self.state.with_custom_login),
                API_KEY => non_empty_or(self.state.api_key(), DEFAULT_API_KEY),
                API_SECRET => non_empty_or(self.state.api_secret(), DEFAULT_API_SECRET),
                other => PropertyValue::from(self.state.field(other).unwrap_or_default()),
            };
            properties.insert(*name, value);
        }
        ConnectorRecord::new(CONNECTOR_SERVICE_NAME, properties)
    }

    /// Validate and persist. Validation failures never reach the store.
    pub async fn save(&mut self) -> Result<(), SettingsError> {
        if let Err(err) = self.validate() {
            debug!(%err, "save rejected");
            self.notifier
                .error_toast(&self.i18n.message(KEY_MISSING_MANDATORY));
            return Err(err);
        }

        let record = self.build_record();
        self.phase = FormPhase::Saving;
        match self.store.write(&record).await {
            Ok(()) => {
                self.state.connector_has_settings = true;
                self.phase = FormPhase::Configured;
                info!(connector = CONNECTOR_SERVICE_NAME, "connector settings saved");
                self.notifier.success_toast(&self.i18n.message(KEY_SAVE_SUCCESS));
                Ok(())
            }
            Err(failure) => {
                warn!(connector = CONNECTOR_SERVICE_NAME, error = %failure, "saving connector settings failed");
                self.phase = FormPhase::SaveError;
                self.notifier.error_toast(&self.failure_message(&failure));
                Err(SettingsError::Persistence(failure))
            }
        }
    }

    pub fn toggle_card(&mut self) {
        self.state.expanded_card = !self.state.expanded_card;
    }

    /// Navigate to the mappers view and return the path taken.
    pub fn go_to_mappers(&self) -> Result<String, SettingsError> {
        if !self.revision.supports_mappers() {
            return Err(SettingsError::Unsupported(format!(
                "schema revision '{}' has no mappers view",
                self.revision
            )));
        }
        let router = self
            .router
            .as_ref()
            .ok_or_else(|| SettingsError::Unsupported("no router attached".to_string()))?;
        let path = mappers_path(CONNECTOR_SERVICE_NAME);
        router.navigate_to(&path);
        Ok(path)
    }

    fn custom_login_active(&self) -> bool {
        self.revision.has_custom_login() && self.state.with_custom_login
    }

    fn failure_message(&self, failure: &StoreFailure) -> String {
        format!("{}: {}", self.i18n.message(KEY_VIEW_TITLE), failure.error)
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> PropertyValue {
    match value {
        Some(v) if !v.is_empty() => PropertyValue::from(v),
        _ => PropertyValue::from(fallback),
    }
}

/// Next view state after a successful read.
///
/// Built from scratch so nothing from an earlier load survives. An empty
/// read yields an unconfigured, disabled form with every field unset.
fn apply_loaded(revision: SchemaRevision, properties: &ConnectorProperties) -> FormViewState {
    let mut next = FormViewState::default();
    if properties.is_empty() {
        return next;
    }

    next.connector_has_settings = true;
    next.expanded_card = true;
    next.enabled = properties.get(ENABLED).map(parse_string_flag).unwrap_or(false);
    next.with_custom_login = revision.has_custom_login() && properties.get_flag(WITH_CUSTOM_LOGIN);
    for name in revision.text_properties() {
        if let Some(value) = properties.get_str(name) {
            next.set_field(name, value);
        }
    }
    next
}
