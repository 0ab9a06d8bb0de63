// src/i18n.rs
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

use crate::error::SettingsError;
use crate::I18N_NAMESPACE;

pub const KEY_MISSING_MANDATORY: &str = "label.missingMandatoryProperties";
pub const KEY_SAVE_SUCCESS: &str = "label.saveSuccess";
/// Prefix of load and save failure messages.
pub const KEY_VIEW_TITLE: &str = "jcauthnt_awsCognitoOAuthView";

static DEFAULT_BUNDLE: Lazy<MessageBundle> = Lazy::new(|| MessageBundle {
    namespace: I18N_NAMESPACE.to_string(),
    messages: [
        (
            KEY_MISSING_MANDATORY,
            "Please fill in all mandatory properties",
        ),
        (KEY_SAVE_SUCCESS, "Settings saved"),
        (KEY_VIEW_TITLE, "AWS Cognito OAuth"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect(),
});

/// Localized messages registered under one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBundle {
    pub namespace: String,
    pub messages: HashMap<String, String>,
}

impl MessageBundle {
    /// English bundle of the Cognito connector.
    pub fn connector_default() -> Self {
        DEFAULT_BUNDLE.clone()
    }

    /// This bundle with `overrides` replacing or adding messages. The
    /// namespace stays this bundle's.
    pub fn overlay(mut self, overrides: &MessageBundle) -> Self {
        self.messages.extend(
            overrides
                .messages
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }
}

/// Message registry of the admin console.
pub trait I18n: Send + Sync {
    /// Register a bundle. Registering the same namespace again is a no-op.
    fn add_bundle(&self, bundle: &MessageBundle);

    /// Localized text for a key; unknown keys come back unchanged.
    fn message(&self, key: &str) -> String;
}

/// In-memory [`I18n`] keyed by namespace. Lookups scan namespaces in
/// registration order, so the first bundle defining a key wins.
#[derive(Default)]
pub struct BundleRegistry {
    bundles: RwLock<Vec<MessageBundle>>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.bundles
            .read()
            .map(|b| b.iter().map(|bundle| bundle.namespace.clone()).collect())
            .unwrap_or_default()
    }
}

impl I18n for BundleRegistry {
    fn add_bundle(&self, bundle: &MessageBundle) {
        let Ok(mut bundles) = self.bundles.write() else {
            return;
        };
        if bundles.iter().any(|b| b.namespace == bundle.namespace) {
            return;
        }
        debug!(namespace = %bundle.namespace, keys = bundle.messages.len(), "registered message bundle");
        bundles.push(bundle.clone());
    }

    fn message(&self, key: &str) -> String {
        self.bundles
            .read()
            .ok()
            .and_then(|bundles| {
                bundles
                    .iter()
                    .find_map(|b| b.messages.get(key).cloned())
            })
            .unwrap_or_else(|| key.to_string())
    }
}

impl<T: I18n + ?Sized> I18n for std::sync::Arc<T> {
    fn add_bundle(&self, bundle: &MessageBundle) {
        (**self).add_bundle(bundle)
    }

    fn message(&self, key: &str) -> String {
        (**self).message(key)
    }
}
