use crate::cli::{BackendKind, Cli};
use crate::commands::{CommandError, Result};
use cognito_core::SchemaRevision;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`. Every key is optional.
///
/// ```toml
/// backend = "http"
/// url = "https://admin.example.com/modules/auth"
/// timeout_secs = 10
/// revision = "custom-login"
/// site = "digitall"
/// messages = "/etc/cognito/messages.fr.json"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub backend: Option<BackendKind>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub settings_file: Option<PathBuf>,
    pub revision: Option<SchemaRevision>,
    pub site: Option<String>,
    pub messages: Option<PathBuf>,
}

impl CliConfig {
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("cognito_connector").join("config.toml")
    }

    /// Read a config file. A missing file yields the defaults unless the
    /// path was given explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::parse(&s).map_err(|e| {
                CommandError::InvalidConfig(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                Ok(Self::default())
            }
            Err(e) => Err(CommandError::InvalidConfig(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn parse(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Effective settings after layering flags and env over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub backend: BackendKind,
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
    pub settings_file: Option<PathBuf>,
    pub revision: SchemaRevision,
    pub site: Option<String>,
    pub messages: Option<PathBuf>,
}

impl Resolved {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => CliConfig::load(path, true)?,
            None => CliConfig::load(&CliConfig::default_path(), false)?,
        };
        Ok(Self::merge(cli, config))
    }

    pub fn merge(cli: &Cli, config: CliConfig) -> Self {
        let url = cli.url.clone().or(config.url);
        // A URL with no explicit backend means the HTTP backend.
        let backend = cli
            .backend
            .or(config.backend)
            .unwrap_or(if url.is_some() {
                BackendKind::Http
            } else {
                BackendKind::File
            });
        Self {
            backend,
            url,
            token: cli.token.clone().or(config.token),
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            settings_file: cli.settings_file.clone().or(config.settings_file),
            revision: cli.revision.or(config.revision).unwrap_or_default(),
            site: cli.site.clone().or(config.site),
            messages: config.messages,
        }
    }
}
