use crate::cli::OutputFormat;
use crate::commands::{CliForm, Result};
use cognito_core::schema::{is_secret, ConnectorConfigSchema, FieldType};
use cognito_core::{FormPhase, SchemaRevision, CONNECTOR_SERVICE_NAME};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

const MASK: &str = "***";

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    Settings(FormSnapshot),
    Saved(FormSnapshot),
    Schema(ConnectorConfigSchema),
    Navigation { path: String },
}

/// Printable copy of the form after a command ran.
#[derive(Debug, Serialize)]
pub struct FormSnapshot {
    pub connector: String,
    pub revision: SchemaRevision,
    pub phase: FormPhase,
    pub connector_has_settings: bool,
    pub enabled: bool,
    pub expanded_card: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_custom_login: Option<bool>,
    pub fields: BTreeMap<String, Option<String>>,
}

impl FormSnapshot {
    pub fn from_form(form: &CliForm, reveal: bool) -> Self {
        let revision = form.revision();
        let state = form.state();
        let fields = revision
            .text_properties()
            .map(|name| {
                let value = state.field(name).map(|v| {
                    if is_secret(name) && !reveal && !v.is_empty() {
                        MASK.to_string()
                    } else {
                        v.to_string()
                    }
                });
                (name.to_string(), value)
            })
            .collect();
        Self {
            connector: CONNECTOR_SERVICE_NAME.to_string(),
            revision,
            phase: form.phase(),
            connector_has_settings: state.connector_has_settings,
            enabled: state.enabled,
            expanded_card: state.expanded_card,
            with_custom_login: revision
                .has_custom_login()
                .then_some(state.with_custom_login),
            fields,
        }
    }
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Pretty => format_pretty(data),
    }
    Ok(())
}

fn format_pretty(data: &OutputData) {
    match data {
        OutputData::Settings(snapshot) | OutputData::Saved(snapshot) => print_snapshot(snapshot),
        OutputData::Schema(schema) => print_schema(schema),
        OutputData::Navigation { path } => println!("{}", path.cyan()),
    }
}

fn yes_no(flag: bool) -> String {
    if flag {
        "yes".green().to_string()
    } else {
        "no".yellow().to_string()
    }
}

fn print_snapshot(snapshot: &FormSnapshot) {
    println!();
    println!(
        "{} {}",
        snapshot.connector.bold().cyan(),
        format!("({})", snapshot.revision).dimmed()
    );
    println!();
    if !snapshot.connector_has_settings {
        println!("{}", "Not configured yet.".yellow());
        println!();
        println!("Run {} to configure the connector.", "cognito save".cyan());
        println!();
        return;
    }

    println!("  Enabled:       {}", yes_no(snapshot.enabled));
    if let Some(custom) = snapshot.with_custom_login {
        println!("  Custom login:  {}", yes_no(custom));
    }
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Property".cyan().bold().to_string()),
        Cell::new("Value".cyan().bold().to_string()),
    ]);
    for (name, value) in &snapshot.fields {
        let shown = match value {
            Some(v) if v.is_empty() => "(empty)".dimmed().to_string(),
            Some(v) => v.clone(),
            None => "(unset)".dimmed().to_string(),
        };
        table.add_row(vec![Cell::new(name), Cell::new(shown)]);
    }
    println!("{}", table);
    println!();
}

fn print_schema(schema: &ConnectorConfigSchema) {
    println!();
    println!(
        "{} {}",
        "Schema".bold().cyan(),
        format!("({})", schema.revision).dimmed()
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Property".cyan().bold().to_string()),
        Cell::new("Label".cyan().bold().to_string()),
        Cell::new("Type".cyan().bold().to_string()),
        Cell::new("Required".cyan().bold().to_string()),
        Cell::new("Notes".cyan().bold().to_string()),
    ]);
    for field in &schema.fields {
        let kind = match field.field_type {
            FieldType::Text => "text",
            FieldType::Secret => "secret",
            FieldType::Boolean => "boolean",
        };
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(&field.label),
            Cell::new(kind),
            Cell::new(if field.required { "yes" } else { "" }),
            Cell::new(field.description.as_deref().unwrap_or_default()),
        ]);
    }
    println!("{}", table);
    println!();
}
