//! Text reports printed by the CLI subcommands.
//!
//! Every function writes to a caller-supplied writer so the same report can
//! go to stdout or to a file (`analyze --output`).

use std::io::Write;

use anyhow::Result;
use chatsift_core::analytics::{
    self, content_stats, gizmo_summary, model_usage, user_data, ArchiveSummary, ProjectSizeStats,
};
use chatsift_core::format::{format_percent, format_timestamp, short_id, truncate_chars};
use chatsift_core::messages;
use chatsift_core::{Archive, FieldCategory, ProjectIndex, Record, SchemaProfile, SearchHit};
use serde_json::Value;

/// Characters of a title shown in listings.
const TITLE_WIDTH: usize = 60;
/// Characters of a conversation id shown in listings.
const ID_WIDTH: usize = 20;
/// Characters of a message shown by `--format messages`.
const MESSAGE_WIDTH: usize = 100;
/// Titles listed for a single project.
const PROJECT_TITLE_LIMIT: usize = 10;
/// Samples shown per field.
const SAMPLES_SHOWN: usize = 3;

fn section(out: &mut dyn Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(40))?;
    Ok(())
}

fn samples_line(schema: &SchemaProfile, field: &str) -> String {
    schema
        .samples(field)
        .iter()
        .take(SAMPLES_SHOWN)
        .map(|s| truncate_chars(s, 40))
        .collect::<Vec<_>>()
        .join(", ")
}

fn listing_title(record: &Record<'_>) -> String {
    truncate_chars(record.title().unwrap_or("No Title"), TITLE_WIDTH)
}

// ============================================
// analyze
// ============================================

/// Full analysis report.
pub fn analysis(out: &mut dyn Write, archive: &Archive, file_name: &str) -> Result<()> {
    let schema = SchemaProfile::build(archive);
    let projects = ProjectIndex::build(archive);
    let summary = ArchiveSummary::compute(archive, &projects, &schema);

    writeln!(out, "{}", "=".repeat(80))?;
    writeln!(out, "CHATGPT ARCHIVE ANALYSIS REPORT")?;
    writeln!(out, "{}", "=".repeat(80))?;
    writeln!(out)?;
    writeln!(out, "File: {}", file_name)?;
    writeln!(out, "Total conversations: {}", summary.total_conversations)?;
    writeln!(out, "Conversations with projects: {}", summary.in_projects)?;
    writeln!(out, "Standalone conversations: {}", summary.standalone)?;
    writeln!(out, "Unique projects: {}", summary.unique_projects)?;
    if summary.malformed > 0 {
        writeln!(out, "Skipped malformed entries: {}", summary.malformed)?;
    }

    section(out, "ALL METADATA FIELDS DISCOVERED:")?;
    for (i, field) in schema.fields().enumerate() {
        writeln!(out, "{:2}. {}: {}", i + 1, field, samples_line(&schema, field))?;
    }

    section(out, "PROJECT ANALYSIS:")?;
    writeln!(out, "Total projects found: {}", projects.len())?;
    for project in projects.by_size() {
        writeln!(
            out,
            "• {} ({}): {} conversations",
            project.display_name(),
            project.id,
            project.conversation_count()
        )?;
        if let Some(title) = project.titles().first() {
            writeln!(out, "  └─ Sample: {}", truncate_chars(title, 50))?;
        }
    }

    let gizmos = gizmo_summary(archive);
    writeln!(out)?;
    writeln!(out, "Unique gizmo IDs: {}", gizmos.unique_gizmo_ids)?;
    writeln!(out, "Gizmo types: {}", counts_line(&gizmos.gizmo_types))?;
    writeln!(out, "Template IDs: {} unique", gizmos.unique_template_ids)?;

    section(out, "MEMORY & USER DATA FIELDS:")?;
    for field in schema
        .fields_in(FieldCategory::Memory)
        .into_iter()
        .chain(schema.fields_in(FieldCategory::User))
    {
        let samples = samples_line(&schema, field);
        let shown = if samples.is_empty() { "present".to_string() } else { samples };
        writeln!(out, "• {}: {}", field, shown)?;
    }

    let user = user_data(archive);
    writeln!(out, "User profile mentions: {}", user.profile_mentions.len())?;
    writeln!(out, "Conversations with memory data: {}", user.memory_records.len())?;
    for mention in user.profile_mentions.iter().take(SAMPLES_SHOWN) {
        writeln!(out, "  {}: {}", mention.title.unwrap_or("No Title"), mention.excerpt)?;
    }
    for record in user.memory_records.iter().take(SAMPLES_SHOWN) {
        let fields: Vec<String> = record
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        writeln!(out, "  {}: {}", record.title.unwrap_or("No Title"), fields.join(", "))?;
    }

    section(out, "SECURITY & ACCESS FIELDS:")?;
    for field in schema.fields_in(FieldCategory::Security) {
        writeln!(out, "• {}: present in {} conversations", field, schema.count(field))?;
    }

    content_section(out, archive)?;
    timeline_section(out, archive)?;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(80))?;
    Ok(())
}

fn counts_line(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(name, n)| format!("{}: {}", name, n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================
// fields
// ============================================

pub fn fields(
    out: &mut dyn Write,
    archive: &Archive,
    category: FieldCategory,
    show_values: bool,
) -> Result<()> {
    let schema = SchemaProfile::build(archive);
    section(out, "METADATA FIELDS ANALYSIS:")?;

    let names = schema.fields_in(category);
    if names.is_empty() {
        writeln!(out, "No {} fields found", category.as_str())?;
        return Ok(());
    }

    for field in names {
        let samples = if show_values {
            format!(" | samples: {}", samples_line(&schema, field))
        } else {
            String::new()
        };
        writeln!(
            out,
            "• {}: present in {} conversations{}",
            field,
            schema.count(field),
            samples
        )?;
    }
    Ok(())
}

// ============================================
// projects
// ============================================

pub fn projects(
    out: &mut dyn Write,
    archive: &Archive,
    names_only: bool,
    detailed: bool,
    project_id: Option<&str>,
) -> Result<()> {
    let index = ProjectIndex::build(archive);
    section(out, "PROJECTS ANALYSIS:")?;

    if let Some(id) = project_id {
        let Some(project) = index.get(id) else {
            writeln!(out, "Project {} not found", id)?;
            return Ok(());
        };
        writeln!(out, "Project ID: {}", project.id)?;
        writeln!(out, "Name: {}", project.display_name())?;
        writeln!(out, "Type: {}", project.gizmo_type.unwrap_or("unknown"))?;
        writeln!(out, "Template: {}", project.template_id.unwrap_or("none"))?;
        writeln!(out, "Conversations: {}", project.conversation_count())?;
        writeln!(out, "Titles:")?;
        for title in project.titles().iter().take(PROJECT_TITLE_LIMIT) {
            writeln!(out, "  • {}", title)?;
        }
        if project.titles().len() > PROJECT_TITLE_LIMIT {
            writeln!(out, "  ... and {} more", project.titles().len() - PROJECT_TITLE_LIMIT)?;
        }
        return Ok(());
    }

    if names_only {
        writeln!(out, "Project Names (derived):")?;
        for project in index.by_size() {
            writeln!(
                out,
                "• {} ({} conversations)",
                project.display_name(),
                project.conversation_count()
            )?;
        }
        return Ok(());
    }

    writeln!(out, "Total projects: {}", index.len())?;

    if detailed {
        writeln!(out)?;
        writeln!(out, "Detailed project breakdown:")?;
        for project in index.by_size() {
            writeln!(out)?;
            writeln!(out, "{}", project.id)?;
            writeln!(out, "   Type: {}", project.gizmo_type.unwrap_or("unknown"))?;
            writeln!(out, "   Conversations: {}", project.conversation_count())?;
            let names = project.name_candidates();
            if !names.is_empty() {
                writeln!(out, "   Derived names: {}", names.join(", "))?;
            }
            let sample: Vec<&str> = project.titles().iter().take(SAMPLES_SHOWN).copied().collect();
            writeln!(out, "   Sample titles: {}", sample.join(", "))?;
        }
        return Ok(());
    }

    let in_projects = index.conversation_count();
    writeln!(out, "Total conversations in projects: {}", in_projects)?;
    writeln!(
        out,
        "Average conversations per project: {}",
        in_projects.checked_div(index.len()).unwrap_or(0)
    )?;
    Ok(())
}

// ============================================
// conversations
// ============================================

/// How `conversations` prints each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConversationFormat {
    /// One timestamped line per conversation
    Summary,
    /// Every top-level field
    Full,
    /// The first text part of every message
    Messages,
}

pub fn conversations(
    out: &mut dyn Write,
    archive: &Archive,
    id: Option<&str>,
    project_id: Option<&str>,
    limit: usize,
    format: ConversationFormat,
) -> Result<()> {
    section(out, "CONVERSATIONS:")?;

    let selected: Vec<Record<'_>> = if let Some(id) = id {
        match archive.find(id) {
            Some(record) => vec![record],
            None => {
                writeln!(out, "Conversation {} not found", id)?;
                return Ok(());
            }
        }
    } else if let Some(project_id) = project_id {
        let members: Vec<_> = archive.in_project(project_id).collect();
        writeln!(out, "Found {} conversations in project {}", members.len(), project_id)?;
        members
    } else {
        archive.records().collect()
    };

    for (i, record) in selected.iter().take(limit).enumerate() {
        let n = i + 1;
        match format {
            ConversationFormat::Summary => {
                writeln!(
                    out,
                    "{}. [{}] {}",
                    n,
                    format_timestamp(record.created_local()),
                    listing_title(record)
                )?;
                writeln!(
                    out,
                    "   ID: {}... | Project: {}",
                    short_id(record.id().unwrap_or("N/A"), ID_WIDTH),
                    record.gizmo_id().unwrap_or("No Project")
                )?;
            }
            ConversationFormat::Full => {
                writeln!(out)?;
                writeln!(out, "Conversation {}:", n)?;
                for (key, value) in record.fields() {
                    writeln!(out, "  {}: {}", key, full_value(key, value))?;
                }
            }
            ConversationFormat::Messages => {
                writeln!(out)?;
                writeln!(out, "Conversation {} - {}:", n, record.title().unwrap_or("No Title"))?;
                for entry in messages::walk(*record).filter(|e| e.has_content()) {
                    let text = entry.parts.first().copied().unwrap_or("No content");
                    writeln!(out, "  [{}] {}", entry.role, truncate_chars(text, MESSAGE_WIDTH))?;
                }
            }
        }
    }
    Ok(())
}

fn full_value(key: &str, value: &Value) -> String {
    match value {
        Value::Object(map) if key == "mapping" => format!("{} messages", map.len()),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) => "(list)".to_string(),
        Value::Object(_) => "(dict)".to_string(),
        Value::Null => "(null)".to_string(),
    }
}

// ============================================
// search
// ============================================

pub fn search_results(
    out: &mut dyn Write,
    hits: &[SearchHit<'_>],
    has_queries: bool,
    limit: usize,
) -> Result<()> {
    section(out, "SEARCH RESULTS:")?;
    if !has_queries {
        writeln!(out, "No search terms given; use --title and/or --content")?;
    }
    writeln!(out, "Found {} matching conversations:", hits.len())?;

    for (i, hit) in hits.iter().take(limit).enumerate() {
        let matches: Vec<String> = hit.matches.iter().map(ToString::to_string).collect();
        writeln!(out)?;
        writeln!(out, "{}. {}", i + 1, listing_title(&hit.record))?;
        writeln!(
            out,
            "   ID: {}... | Matches: {}",
            short_id(hit.record.id().unwrap_or("N/A"), ID_WIDTH),
            matches.join(", ")
        )?;
    }

    if hits.len() > limit {
        writeln!(out)?;
        writeln!(out, "... and {} more results", hits.len() - limit)?;
    }
    Ok(())
}

// ============================================
// stats
// ============================================

/// Which statistics block `stats` prints after the content summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    General,
    ModelUsage,
    Timeline,
    Projects,
}

pub fn stats(out: &mut dyn Write, archive: &Archive, view: StatsView) -> Result<()> {
    content_section(out, archive)?;
    match view {
        StatsView::General => general_section(out, archive),
        StatsView::ModelUsage => model_usage_section(out, archive),
        StatsView::Timeline => timeline_section(out, archive),
        StatsView::Projects => project_stats_section(out, archive),
    }
}

fn content_section(out: &mut dyn Write, archive: &Archive) -> Result<()> {
    let stats = content_stats(archive);
    section(out, "CONTENT STATISTICS:")?;
    writeln!(out, "Total messages: {}", stats.total_messages)?;
    writeln!(out, "AI models used: {}", counts_line(&stats.models.models))?;
    writeln!(out, "Message roles: {}", counts_line(&stats.roles))?;
    writeln!(out, "Content types: {}", counts_line(&stats.content_types))?;
    writeln!(out, "Average message length: {} characters", stats.average_length)?;
    if let Some((earliest, latest)) = stats.date_range {
        writeln!(out, "Date range: {} to {}", earliest, latest)?;
    }
    Ok(())
}

fn general_section(out: &mut dyn Write, archive: &Archive) -> Result<()> {
    let schema = SchemaProfile::build(archive);
    let projects = ProjectIndex::build(archive);
    let summary = ArchiveSummary::compute(archive, &projects, &schema);

    section(out, "GENERAL STATISTICS:")?;
    writeln!(out, "Total conversations: {}", summary.total_conversations)?;
    writeln!(
        out,
        "Conversations in projects: {} ({})",
        summary.in_projects,
        format_percent(summary.in_projects_pct())
    )?;
    writeln!(
        out,
        "Standalone conversations: {} ({})",
        summary.standalone,
        format_percent(summary.standalone_pct())
    )?;
    writeln!(out, "Unique projects: {}", summary.unique_projects)?;
    writeln!(out, "Metadata fields discovered: {}", summary.metadata_fields)?;
    Ok(())
}

fn model_usage_section(out: &mut dyn Write, archive: &Archive) -> Result<()> {
    let usage = model_usage(archive);
    section(out, "AI MODEL USAGE:")?;
    if usage.models.is_empty() {
        writeln!(out, "No model information found")?;
    }
    for (model, count) in &usage.models {
        writeln!(
            out,
            "{}: {} conversations ({})",
            model,
            count,
            format_percent(usage.share(*count))
        )?;
    }
    Ok(())
}

fn timeline_section(out: &mut dyn Write, archive: &Archive) -> Result<()> {
    section(out, "CONVERSATION TIMELINE:")?;
    let Some(timeline) = analytics::timeline(archive) else {
        writeln!(out, "No creation times found")?;
        return Ok(());
    };

    writeln!(out, "Date range: {} to {}", timeline.earliest, timeline.latest)?;
    writeln!(out)?;
    writeln!(out, "Conversations by month:")?;
    for (month, count) in &timeline.monthly {
        writeln!(out, "  {}: {} conversations", month, count)?;
    }
    Ok(())
}

fn project_stats_section(out: &mut dyn Write, archive: &Archive) -> Result<()> {
    let index = ProjectIndex::build(archive);
    section(out, "PROJECT STATISTICS:")?;
    let Some(stats) = ProjectSizeStats::compute(&index) else {
        writeln!(out, "No projects found")?;
        return Ok(());
    };

    writeln!(out, "Total projects: {}", stats.total_projects)?;
    writeln!(out, "Average conversations per project: {:.1}", stats.average)?;
    writeln!(out, "Largest project: {} conversations", stats.largest)?;
    writeln!(out, "Smallest project: {} conversations", stats.smallest)?;
    writeln!(out)?;
    writeln!(out, "Project size distribution:")?;
    for (bucket, count) in &stats.distribution {
        writeln!(out, "  {} conversations: {} projects", bucket.label(), count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn archive() -> Archive {
        Archive::new(vec![
            json!({
                "id": "conv-0001",
                "title": "Trip Planning",
                "gizmo_id": "g-p-travel",
                "default_model_slug": "gpt-4o",
                "mapping": {
                    "m1": {"message": {"author": {"role": "user"}, "content": {"content_type": "text", "parts": ["Book a hotel in Lisbon"]}}}
                }
            }),
            json!({"id": "conv-0002", "title": "Weekend chat", "default_model_slug": "o1"}),
        ])
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_conversation_summary_and_limit() {
        let archive = archive();
        let text = render(|out| {
            conversations(out, &archive, None, None, 1, ConversationFormat::Summary)
        });

        assert!(text.contains("1. [Unknown] Trip Planning"));
        assert!(text.contains("ID: conv-0001... | Project: g-p-travel"));
        assert!(!text.contains("Weekend chat"));
    }

    #[test]
    fn test_conversation_full_and_messages() {
        let archive = archive();
        let full = render(|out| {
            conversations(out, &archive, Some("conv-0001"), None, 10, ConversationFormat::Full)
        });
        assert!(full.contains("  mapping: 1 messages"));
        assert!(full.contains("  title: Trip Planning"));

        let messages = render(|out| {
            conversations(out, &archive, Some("conv-0001"), None, 10, ConversationFormat::Messages)
        });
        assert!(messages.contains("  [user] Book a hotel in Lisbon"));
    }

    #[test]
    fn test_unknown_conversation_is_reported() {
        let archive = archive();
        let text = render(|out| {
            conversations(out, &archive, Some("nope"), None, 10, ConversationFormat::Summary)
        });
        assert!(text.contains("Conversation nope not found"));
    }

    #[test]
    fn test_search_results_overflow_line() {
        let archive = archive();
        let hits = chatsift_core::search(
            &archive,
            &chatsift_core::SearchCriteria {
                title: Some("a".into()),
                ..Default::default()
            },
        );
        let text = render(|out| search_results(out, &hits, true, 1));

        assert!(text.contains("Found 2 matching conversations:"));
        assert!(text.contains("Matches: title: a"));
        assert!(text.contains("... and 1 more results"));
    }

    #[test]
    fn test_model_usage_stats() {
        let archive = archive();
        let text = render(|out| stats(out, &archive, StatsView::ModelUsage));
        assert!(text.contains("gpt-4o: 1 conversations (50.0%)"));
        assert!(text.contains("Total messages: 1"));
    }

    #[test]
    fn test_full_value_shapes() {
        assert_eq!(full_value("mapping", &json!({"a": {}, "b": {}})), "2 messages");
        assert_eq!(full_value("safe_urls", &json!([])), "(list)");
        assert_eq!(full_value("gizmo_id", &Value::Null), "(null)");
        assert_eq!(full_value("is_archived", &json!(false)), "false");
    }
}
