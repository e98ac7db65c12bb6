//! Core domain types for chatsift
//!
//! An export is a flat JSON array of conversation objects. Nothing about the
//! shape of those objects is guaranteed, so the model here is a thin typed
//! view over the decoded JSON rather than a strict deserialization target.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Archive** | The whole decoded export, malformed entries included |
//! | **Record** | One well-formed conversation (a JSON object) |
//! | **Mapping** | A record's message tree: message id -> node |
//! | **Project** | Records sharing a `gizmo_id` (see [`crate::projects`]) |
//!
//! Entries that are not JSON objects are kept in the [`Archive`] (they count
//! toward its length) but never surface as a [`Record`].

use chrono::{DateTime, Local, TimeZone};
use serde_json::{Map, Value};

// ============================================
// Archive
// ============================================

/// The memory-resident conversation collection for one analysis session.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<Value>,
}

impl Archive {
    /// Wrap already-decoded archive entries.
    pub fn new(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    /// Number of entries, including malformed ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries in archive order.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Iterate well-formed records in archive order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.entries.iter().filter_map(Record::from_value)
    }

    /// Number of entries that are not JSON objects.
    pub fn malformed_count(&self) -> usize {
        self.entries.iter().filter(|v| !v.is_object()).count()
    }

    /// Find a conversation by its `id`.
    pub fn find(&self, id: &str) -> Option<Record<'_>> {
        self.records().find(|r| r.id() == Some(id))
    }

    /// All conversations whose `gizmo_id` equals `project_id`.
    pub fn in_project<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = Record<'a>> + 'a {
        self.records()
            .filter(move |r| r.gizmo_id() == Some(project_id))
    }
}

impl From<Vec<Value>> for Archive {
    fn from(entries: Vec<Value>) -> Self {
        Self::new(entries)
    }
}

// ============================================
// Record
// ============================================

/// Borrowed view of one well-formed conversation.
///
/// Typed accessors cover the fields the analyses rely on; everything else is
/// reachable through [`Record::fields`]. String accessors return `None` for
/// missing, null, non-string and empty values alike.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// View a JSON value as a record. Returns `None` unless it is an object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    /// All top-level fields in document order.
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    /// Raw access to a top-level field.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }

    fn non_empty_str(&self, field: &str) -> Option<&'a str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn id(&self) -> Option<&'a str> {
        self.non_empty_str("id")
    }

    pub fn title(&self) -> Option<&'a str> {
        self.non_empty_str("title")
    }

    /// Project identifier. `None` means the conversation is standalone.
    pub fn gizmo_id(&self) -> Option<&'a str> {
        self.non_empty_str("gizmo_id")
    }

    pub fn gizmo_type(&self) -> Option<&'a str> {
        self.non_empty_str("gizmo_type")
    }

    pub fn template_id(&self) -> Option<&'a str> {
        self.non_empty_str("conversation_template_id")
    }

    pub fn default_model_slug(&self) -> Option<&'a str> {
        self.non_empty_str("default_model_slug")
    }

    /// Creation time in Unix seconds. Zero is treated as absent.
    pub fn create_time(&self) -> Option<f64> {
        self.fields
            .get("create_time")
            .and_then(Value::as_f64)
            .filter(|t| *t != 0.0)
    }

    /// Last update time in Unix seconds.
    pub fn update_time(&self) -> Option<f64> {
        self.fields.get("update_time").and_then(Value::as_f64)
    }

    /// Creation time converted into `tz`.
    pub fn created_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let secs = self.create_time()?;
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9) as u32;
        tz.timestamp_opt(whole as i64, nanos).single()
    }

    /// Creation time in the local timezone.
    pub fn created_local(&self) -> Option<DateTime<Local>> {
        self.created_in(&Local)
    }

    /// The message mapping, when present and an object.
    pub fn mapping(&self) -> Option<&'a Map<String, Value>> {
        self.fields.get("mapping").and_then(Value::as_object)
    }

    /// Number of nodes in the mapping (structural nodes included).
    pub fn node_count(&self) -> usize {
        self.mapping().map_or(0, Map::len)
    }
}
