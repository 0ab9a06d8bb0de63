pub mod mappers;
pub mod save;
pub mod schema;
pub mod show;

use crate::cli::BackendKind;
use crate::config::Resolved;
use cognito_core::i18n::MessageBundle;
use cognito_core::store::HttpStoreOptions;
use cognito_core::{
    BundleRegistry, ConnectorSettingsForm, FileSettingsStore, HttpSettingsStore, I18n,
    LoggingRouter, Notifier, SettingsError, SettingsStore, SiteScopedStore,
};
use owo_colors::OwoColorize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CommandError {
    /// Validation and persistence failures reach the user as toasts.
    pub fn already_reported(&self) -> bool {
        matches!(
            self,
            CommandError::Settings(
                SettingsError::MissingMandatoryProperties(_) | SettingsError::Persistence(_)
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub type CliForm = ConnectorSettingsForm<Box<dyn SettingsStore>, BundleRegistry, ConsoleNotifier>;

/// Prints toasts on stderr so structured output on stdout stays clean.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success_toast(&self, message: &str) {
        eprintln!("{} {}", "Success!".green().bold(), message);
    }

    fn error_toast(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message.red());
    }
}

pub fn build_store(resolved: &Resolved) -> Result<Box<dyn SettingsStore>> {
    let store = build_backend(resolved)?;
    match &resolved.site {
        Some(site) => {
            tracing::debug!(site = %site, "scoping settings to site");
            Ok(Box::new(SiteScopedStore::new(store, site.clone())))
        }
        None => Ok(store),
    }
}

fn build_backend(resolved: &Resolved) -> Result<Box<dyn SettingsStore>> {
    match resolved.backend {
        BackendKind::File => {
            let store = match &resolved.settings_file {
                Some(path) => FileSettingsStore::new(path),
                None => FileSettingsStore::new_default(),
            };
            tracing::debug!(path = %store.config_path(), "using file settings store");
            Ok(Box::new(store))
        }
        BackendKind::Http => {
            let url = resolved.url.as_deref().ok_or_else(|| {
                CommandError::InvalidConfig(
                    "the http backend needs --url or COGNITO_BACKEND_URL".to_string(),
                )
            })?;
            let options = HttpStoreOptions {
                bearer_token: resolved.token.clone(),
                timeout: resolved.timeout,
            };
            let store = HttpSettingsStore::new(url, options)?;
            tracing::debug!(url = %store.base_url(), "using http settings store");
            Ok(Box::new(store))
        }
    }
}

/// Message registry. Override messages are merged into the connector's
/// English bundle, so keys they leave out keep their default text.
pub fn build_i18n(resolved: &Resolved) -> Result<BundleRegistry> {
    let registry = BundleRegistry::new();
    if let Some(path) = &resolved.messages {
        let overrides = MessageBundle::from_json_file(path)?;
        registry.add_bundle(&MessageBundle::connector_default().overlay(&overrides));
    }
    Ok(registry)
}

pub fn build_form(resolved: &Resolved) -> Result<CliForm> {
    let form = ConnectorSettingsForm::new(
        resolved.revision,
        build_store(resolved)?,
        build_i18n(resolved)?,
        ConsoleNotifier,
    )
    .with_router(Arc::new(LoggingRouter));
    Ok(form)
}
