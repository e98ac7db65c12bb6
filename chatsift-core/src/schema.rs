//! Schema discovery
//!
//! The export has no published schema and its fields drift between export
//! versions, so the field inventory is built empirically: one pass over the
//! archive records every top-level field name, how many conversations carry
//! it, and a handful of sample value shapes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::{Archive, Record};

/// Maximum number of distinct samples kept per field.
pub const SAMPLE_CAP: usize = 10;

/// Field inventory for one archive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaProfile {
    counts: BTreeMap<String, usize>,
    samples: BTreeMap<String, Vec<String>>,
}

impl SchemaProfile {
    /// Scan every well-formed record of the archive.
    pub fn build(archive: &Archive) -> Self {
        let mut profile = Self::default();
        for record in archive.records() {
            profile.observe(record);
        }

        tracing::info!(
            fields = profile.counts.len(),
            conversations = archive.len(),
            "Schema profile built"
        );
        profile
    }

    fn observe(&mut self, record: Record<'_>) {
        for (field, value) in record.fields() {
            *self.counts.entry(field.clone()).or_insert(0) += 1;

            let samples = self.samples.entry(field.clone()).or_default();
            if samples.len() < SAMPLE_CAP {
                let shape = describe_value(value);
                if !samples.contains(&shape) {
                    samples.push(shape);
                }
            }
        }
    }

    /// All discovered field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.counts.contains_key(field)
    }

    /// Number of conversations carrying `field` (0 if never seen).
    pub fn count(&self, field: &str) -> usize {
        self.counts.get(field).copied().unwrap_or(0)
    }

    /// Sample value shapes for `field`, in discovery order.
    pub fn samples(&self, field: &str) -> &[String] {
        self.samples.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Fields of `category` that are actually present, in category order
    /// (or sorted for [`FieldCategory::All`]).
    pub fn fields_in(&self, category: FieldCategory) -> Vec<&str> {
        match category.field_names() {
            Some(names) => names
                .iter()
                .copied()
                .filter(|f| self.contains(f))
                .collect(),
            None => self.fields().collect(),
        }
    }
}

/// Shape descriptor for a sample value.
///
/// Scalars are stored verbatim; containers are summarized by size.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => format!("list[{}]", items.len()),
        Value::Object(map) => format!("dict[{} keys]", map.len()),
        Value::Null => "null".to_string(),
    }
}

/// Named groups of well-known export fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    All,
    Projects,
    Memory,
    Security,
    User,
}

impl FieldCategory {
    /// Member fields, or `None` for [`FieldCategory::All`].
    pub fn field_names(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldCategory::All => None,
            FieldCategory::Projects => Some(&["gizmo_id", "gizmo_type", "conversation_template_id"]),
            FieldCategory::Memory => Some(MEMORY_FIELDS),
            FieldCategory::Security => Some(&[
                "safe_urls",
                "blocked_urls",
                "disabled_tool_ids",
                "moderation_results",
            ]),
            FieldCategory::User => Some(&["owner", "sugar_item_id", "sugar_item_visible", "is_starred"]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::All => "all",
            FieldCategory::Projects => "projects",
            FieldCategory::Memory => "memory",
            FieldCategory::Security => "security",
            FieldCategory::User => "user",
        }
    }
}

impl std::str::FromStr for FieldCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FieldCategory::All),
            "projects" => Ok(FieldCategory::Projects),
            "memory" => Ok(FieldCategory::Memory),
            "security" => Ok(FieldCategory::Security),
            "user" => Ok(FieldCategory::User),
            _ => Err(format!("unknown field category: {}", s)),
        }
    }
}

/// Fields that describe memory behavior of a conversation.
pub const MEMORY_FIELDS: &[&str] = &["memory_scope", "is_do_not_remember", "context_scopes"];
