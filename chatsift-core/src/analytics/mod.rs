//! Analytics module for chatsift
//!
//! Independent reducers over the archive or the project grouping:
//! - Model usage and creation timeline ([`usage`])
//! - Project size distribution and gizmo metadata ([`project`])
//! - Archive-wide summary ([`dashboard`])
//! - Message/content statistics and user-data discovery ([`content`])
//!
//! Every function here is a pure fold over already-resident data.

pub mod content;
pub mod dashboard;
pub mod project;
pub mod usage;

pub use content::{content_stats, user_data, ContentStats, MemoryRecord, ProfileMention, UserData};
pub use dashboard::ArchiveSummary;
pub use project::{gizmo_summary, GizmoSummary, ProjectRow, ProjectSizeStats, SizeBucket};
pub use usage::{model_usage, timeline, timeline_in, ModelUsage, Timeline};

/// `part` as a percentage of `whole` (0 when `whole` is 0).
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Occurrence counter that remembers first-seen order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tally {
    counts: Vec<(String, usize)>,
}

impl Tally {
    pub(crate) fn add(&mut self, key: &str) {
        match self.counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((key.to_string(), 1)),
        }
    }

    /// Entries by count descending; ties keep first-seen order.
    pub(crate) fn into_sorted(mut self) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
    }
}
