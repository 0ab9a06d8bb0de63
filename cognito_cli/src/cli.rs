use clap::{Args, Parser, Subcommand, ValueEnum};
use cognito_core::SchemaRevision;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cognito")]
#[command(about = "Manage the AWS Cognito OAuth connector settings")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  cognito show                                   Show the stored settings
  cognito save --enabled --api-key ID --prompt-secrets \\
               --endpoint https://auth.example.com --region eu-west-1
  cognito save --custom-login --secret-key KEY --login-url https://login.example.com
  cognito schema                                 Describe the managed properties

\x1b[1;36mBackends:\x1b[0m
  cognito --backend http --url https://admin.example.com/modules/auth show
  cognito --backend file --settings-file ./settings.json show
  cognito --site digitall show                  Per-site settings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (defaults to <config dir>/cognito_connector/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Settings backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Base URL of the settings backend (http backend)
    #[arg(long, global = true, env = "COGNITO_BACKEND_URL")]
    pub url: Option<String>,

    /// Bearer token for the settings backend (http backend)
    #[arg(long, global = true, env = "COGNITO_BACKEND_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Settings file (file backend)
    #[arg(long, global = true, env = "COGNITO_SETTINGS_FILE")]
    pub settings_file: Option<PathBuf>,

    /// Site whose settings to manage; falls back to the system site on read
    #[arg(long, global = true, env = "COGNITO_SITE")]
    pub site: Option<String>,

    /// Schema revision of the settings form
    #[arg(long, global = true, value_parser = parse_revision)]
    pub revision: Option<SchemaRevision>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and display the stored connector settings
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  cognito show
  cognito show --reveal --output json")]
    Show {
        /// Print secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Validate and store connector settings
    ///
    /// The stored settings are loaded first; only the given fields change.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  cognito save --enabled --api-key ID --api-secret SECRET --endpoint URL --region eu-west-1
  cognito save --custom-login --secret-key KEY --login-url https://login.example.com
  cognito save --disabled")]
    Save(SaveArgs),

    /// Print the path of the connector's mappers view
    Mappers,

    /// Describe the properties managed by the selected revision
    Schema,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SaveArgs {
    /// Enable the connector
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,
    /// Disable the connector
    #[arg(long)]
    pub disabled: bool,
    /// Use a custom login page instead of the hosted UI
    #[arg(long, conflicts_with = "no_custom_login")]
    pub custom_login: bool,
    /// Use the hosted UI
    #[arg(long)]
    pub no_custom_login: bool,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub api_secret: Option<String>,
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub scope: Option<String>,
    #[arg(long)]
    pub callback_url: Option<String>,
    #[arg(long)]
    pub logout_endpoint: Option<String>,
    #[arg(long)]
    pub logout_callback_url: Option<String>,
    #[arg(long)]
    pub secret_key: Option<String>,
    #[arg(long)]
    pub login_url: Option<String>,
    /// Ask for secret values on the terminal instead of the command line
    #[arg(long)]
    pub prompt_secrets: bool,
}

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Yaml,
}

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Http,
}

fn parse_revision(s: &str) -> Result<SchemaRevision, String> {
    s.parse()
}
