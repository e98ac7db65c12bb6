//! `export` subcommand: write archive data to a file as JSON, CSV or text.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chatsift_core::analytics::{ArchiveSummary, ProjectRow};
use chatsift_core::{Archive, ProjectIndex, SchemaProfile};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportType {
    /// The raw conversation records
    Conversations,
    /// One entry per project with its inferred name
    Projects,
    /// Field inventory with counts and samples
    Fields,
    /// Archive-wide totals
    Stats,
}

impl ExportType {
    fn as_str(&self) -> &'static str {
        match self {
            ExportType::Conversations => "conversations",
            ExportType::Projects => "projects",
            ExportType::Fields => "fields",
            ExportType::Stats => "stats",
        }
    }
}

/// Export `kind` as `format` into `path`.
pub fn export(archive: &Archive, kind: ExportType, format: ExportFormat, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &export_value(archive, kind)?)?;
            writeln!(out)?;
        }
        ExportFormat::Csv => write_csv(&mut out, archive, kind)?,
        ExportFormat::Txt => write_txt(&mut out, &export_value(archive, kind)?, kind)?,
    }
    out.flush()?;

    tracing::info!(
        kind = kind.as_str(),
        format = ?format,
        path = %path.display(),
        "Export written"
    );
    Ok(())
}

/// The document exported for `kind`.
pub fn export_value(archive: &Archive, kind: ExportType) -> Result<Value> {
    let value = match kind {
        ExportType::Conversations => Value::Array(archive.entries().to_vec()),
        ExportType::Projects => {
            let index = ProjectIndex::build(archive);
            let mut projects = Map::new();
            for project in index.iter() {
                let row = ProjectRow::from_project(project);
                projects.insert(
                    row.id.clone(),
                    json!({
                        "name": row.name,
                        "conversation_count": row.conversation_count,
                        "type": row.gizmo_type,
                        "conversation_ids": row.conversation_ids,
                    }),
                );
            }
            Value::Object(projects)
        }
        ExportType::Fields => {
            let schema = SchemaProfile::build(archive);
            let samples: Map<String, Value> = schema
                .fields()
                .map(|field| (field.to_string(), json!(schema.samples(field))))
                .collect();
            json!({
                "all_fields": schema.fields().collect::<Vec<_>>(),
                "field_counts": schema.counts(),
                "field_samples": samples,
            })
        }
        ExportType::Stats => {
            let schema = SchemaProfile::build(archive);
            let index = ProjectIndex::build(archive);
            let summary = ArchiveSummary::compute(archive, &index, &schema);
            json!({
                "total_conversations": summary.total_conversations,
                "projects": summary.unique_projects,
                "standalone_conversations": summary.standalone,
                "metadata_fields": summary.metadata_fields,
            })
        }
    };
    Ok(value)
}

fn write_txt(out: &mut dyn Write, value: &Value, kind: ExportType) -> Result<()> {
    writeln!(out, "ChatGPT Archive Analysis - {}", kind.as_str().to_uppercase())?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;

    match value {
        Value::Object(map) => {
            for (key, value) in map {
                writeln!(out, "{}: {}", key, value)?;
            }
        }
        other => writeln!(out, "{}", other)?,
    }
    Ok(())
}

fn write_csv(out: &mut dyn Write, archive: &Archive, kind: ExportType) -> Result<()> {
    match kind {
        ExportType::Conversations => {
            csv_row(out, &["ID", "Title", "Create Time", "Project ID", "Message Count"])?;
            for record in archive.records() {
                let create_time = record.get("create_time").map(csv_scalar).unwrap_or_default();
                csv_row(
                    out,
                    &[
                        record.id().unwrap_or_default(),
                        record.title().unwrap_or_default(),
                        &create_time,
                        record.gizmo_id().unwrap_or_default(),
                        &record.node_count().to_string(),
                    ],
                )?;
            }
        }
        ExportType::Projects => {
            csv_row(out, &["Project ID", "Name", "Type", "Conversation Count"])?;
            let index = ProjectIndex::build(archive);
            for project in index.by_size() {
                let row = ProjectRow::from_project(project);
                csv_row(
                    out,
                    &[
                        &row.id,
                        &row.name,
                        row.gizmo_type.as_deref().unwrap_or_default(),
                        &row.conversation_count.to_string(),
                    ],
                )?;
            }
        }
        ExportType::Fields => {
            csv_row(out, &["Field", "Count", "Samples"])?;
            let schema = SchemaProfile::build(archive);
            for field in schema.fields() {
                csv_row(
                    out,
                    &[field, &schema.count(field).to_string(), &schema.samples(field).join("; ")],
                )?;
            }
        }
        ExportType::Stats => {
            csv_row(out, &["Metric", "Value"])?;
            if let Value::Object(map) = export_value(archive, kind)? {
                for (key, value) in &map {
                    csv_row(out, &[key, &csv_scalar(value)])?;
                }
            }
        }
    }
    Ok(())
}

fn csv_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn csv_row(out: &mut dyn Write, fields: &[&str]) -> Result<()> {
    let escaped: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    writeln!(out, "{}", escaped.join(","))?;
    Ok(())
}

/// Quote a CSV field when it contains a separator, quote or line break.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
