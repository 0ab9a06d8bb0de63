use crate::cli::Cli;
use crate::commands::Result;
use crate::config::Resolved;
use crate::output::{format_output, OutputData};

pub async fn run(cli: &Cli, resolved: &Resolved) -> Result<()> {
    format_output(&OutputData::Schema(resolved.revision.schema()), &cli.output)
}
