// src/error.rs
use crate::store::StoreFailure;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing mandatory properties: {}", .0.join(", "))]
    MissingMandatoryProperties(Vec<String>),

    #[error("Persistence error: {0}")]
    Persistence(StoreFailure),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SettingsError {
    pub fn code_str(&self) -> &'static str {
        match self {
            SettingsError::MissingMandatoryProperties(_) => "missing_mandatory",
            SettingsError::Persistence(_) => "persistence_error",
            SettingsError::Unsupported(_) => "unsupported",
            SettingsError::HttpRequest(_) => "upstream_error",
            SettingsError::Config(_) => "invalid_config",
            SettingsError::Io(_) | SettingsError::SerdeJson(_) => "internal_error",
        }
    }

    /// True for errors detected locally, before any store call.
    pub fn is_validation(&self) -> bool {
        matches!(self, SettingsError::MissingMandatoryProperties(_))
    }
}

impl From<StoreFailure> for SettingsError {
    fn from(failure: StoreFailure) -> Self {
        SettingsError::Persistence(failure)
    }
}
