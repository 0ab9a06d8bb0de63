use crate::cli::{Cli, SaveArgs};
use crate::commands::{build_form, Result};
use crate::config::Resolved;
use crate::output::{format_output, FormSnapshot, OutputData};
use cognito_core::schema::{
    is_secret, API_KEY, API_SECRET, CALLBACK_URL, ENDPOINT, LOGIN_URL, LOGOUT_CALLBACK_URL,
    LOGOUT_ENDPOINT, REGION, SCOPE, SECRET_KEY,
};
use cognito_core::{FormViewState, SchemaRevision};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use tracing::warn;

pub async fn run(cli: &Cli, resolved: &Resolved, args: &SaveArgs) -> Result<()> {
    let mut form = build_form(resolved)?;
    form.activate().await?;

    let revision = form.revision();
    let ignored = apply_args(form.state_mut(), revision, args);
    for flag in &ignored {
        warn!(flag = %flag, revision = %revision, "option not used by this schema revision");
    }

    if args.prompt_secrets {
        for name in revision.text_properties().filter(|name| is_secret(name)) {
            if let Some(value) = prompt_secret(name)? {
                form.state_mut().set_field(name, value);
            }
        }
    }

    form.save().await?;
    let snapshot = FormSnapshot::from_form(&form, false);
    format_output(&OutputData::Saved(snapshot), &cli.output)
}

/// Overlay the given options on the loaded state.
///
/// Returns the options naming properties the revision does not manage;
/// those are left out of the state.
pub fn apply_args(
    state: &mut FormViewState,
    revision: SchemaRevision,
    args: &SaveArgs,
) -> Vec<String> {
    let mut ignored = Vec::new();

    if args.enabled {
        state.enabled = true;
    } else if args.disabled {
        state.enabled = false;
    }

    if args.custom_login || args.no_custom_login {
        if revision.has_custom_login() {
            state.with_custom_login = args.custom_login;
        } else if args.custom_login {
            ignored.push("--custom-login".to_string());
        } else {
            ignored.push("--no-custom-login".to_string());
        }
    }

    let text = [
        (API_KEY, "--api-key", &args.api_key),
        (API_SECRET, "--api-secret", &args.api_secret),
        (ENDPOINT, "--endpoint", &args.endpoint),
        (REGION, "--region", &args.region),
        (SCOPE, "--scope", &args.scope),
        (CALLBACK_URL, "--callback-url", &args.callback_url),
        (LOGOUT_ENDPOINT, "--logout-endpoint", &args.logout_endpoint),
        (
            LOGOUT_CALLBACK_URL,
            "--logout-callback-url",
            &args.logout_callback_url,
        ),
        (SECRET_KEY, "--secret-key", &args.secret_key),
        (LOGIN_URL, "--login-url", &args.login_url),
    ];
    for (property, flag, value) in text {
        let Some(value) = value else {
            continue;
        };
        if revision.recognizes(property) {
            state.set_field(property, value.clone());
        } else {
            ignored.push(flag.to_string());
        }
    }

    ignored
}

/// Hidden prompt; an empty answer keeps the current value.
fn prompt_secret(name: &str) -> Result<Option<String>> {
    eprint!("{} {} ", name.cyan().bold(), "(leave empty to keep):".dimmed());
    io::stderr().flush()?;
    let value = match rpassword::read_password() {
        Ok(password) => password.trim().to_string(),
        Err(_) => {
            // Fallback to regular input if rpassword fails (e.g., in non-TTY)
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };
    Ok((!value.is_empty()).then_some(value))
}
