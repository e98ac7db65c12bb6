//! Archive-wide summary for report headers.

use serde::Serialize;

use super::percentage;
use crate::projects::ProjectIndex;
use crate::schema::SchemaProfile;
use crate::types::Archive;

/// Top-level numbers shown at the start of every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveSummary {
    // Totals
    /// Archive length, malformed entries included
    pub total_conversations: usize,
    /// Conversations that belong to some project
    pub in_projects: usize,
    /// `total_conversations - in_projects`
    pub standalone: usize,
    pub unique_projects: usize,

    /// Distinct top-level fields seen across records
    pub metadata_fields: usize,
    /// Entries that are not JSON objects
    pub malformed: usize,
}

impl ArchiveSummary {
    pub fn compute(archive: &Archive, projects: &ProjectIndex<'_>, schema: &SchemaProfile) -> Self {
        let total_conversations = archive.len();
        let in_projects = projects.conversation_count();

        Self {
            total_conversations,
            in_projects,
            standalone: total_conversations.saturating_sub(in_projects),
            unique_projects: projects.len(),
            metadata_fields: schema.len(),
            malformed: archive.malformed_count(),
        }
    }

    pub fn in_projects_pct(&self) -> f64 {
        percentage(self.in_projects, self.total_conversations)
    }

    pub fn standalone_pct(&self) -> f64 {
        percentage(self.standalone, self.total_conversations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts_malformed_entries_as_standalone() {
        let archive = Archive::new(vec![
            json!({"id": "1", "gizmo_id": "g-p-1"}),
            json!({"id": "2", "gizmo_id": "g-p-1", "title": "x"}),
            json!({"id": "3", "gizmo_id": "g-p-2"}),
            json!({"id": "4"}),
            json!(42),
        ]);
        let projects = ProjectIndex::build(&archive);
        let schema = SchemaProfile::build(&archive);
        let summary = ArchiveSummary::compute(&archive, &projects, &schema);

        assert_eq!(
            summary,
            ArchiveSummary {
                total_conversations: 5,
                in_projects: 3,
                standalone: 2,
                unique_projects: 2,
                metadata_fields: 3,
                malformed: 1,
            }
        );
        assert!((summary.in_projects_pct() - 60.0).abs() < 1e-9);
        assert!((summary.standalone_pct() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::default();
        let projects = ProjectIndex::build(&archive);
        let schema = SchemaProfile::build(&archive);
        let summary = ArchiveSummary::compute(&archive, &projects, &schema);

        assert_eq!(summary.total_conversations, 0);
        assert_eq!(summary.in_projects_pct(), 0.0);
    }
}
