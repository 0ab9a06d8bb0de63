use crate::cli::Cli;
use crate::commands::{build_form, Result};
use crate::config::Resolved;
use crate::output::{format_output, FormSnapshot, OutputData};

pub async fn run(cli: &Cli, resolved: &Resolved, reveal: bool) -> Result<()> {
    let mut form = build_form(resolved)?;
    form.activate().await?;
    let snapshot = FormSnapshot::from_form(&form, reveal);
    format_output(&OutputData::Settings(snapshot), &cli.output)
}
