use crate::cli::Cli;
use crate::commands::{build_form, Result};
use crate::config::Resolved;
use crate::output::{format_output, OutputData};

pub async fn run(cli: &Cli, resolved: &Resolved) -> Result<()> {
    let form = build_form(resolved)?;
    let path = form.go_to_mappers()?;
    format_output(&OutputData::Navigation { path }, &cli.output)
}
