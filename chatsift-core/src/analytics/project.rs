//! Project-level analytics.
//!
//! Size distribution across projects, gizmo metadata, and the flat
//! per-project rows used for listings and exports.

use serde::Serialize;

use super::Tally;
use crate::projects::{Project, ProjectIndex};
use crate::types::Archive;

/// Row for project list display and export (lightweight).
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRow {
    /// Project ID (`gizmo_id`)
    pub id: String,
    /// Inferred name, or the id-derived fallback
    pub name: String,
    /// Number of conversations in this project
    pub conversation_count: usize,
    /// `gizmo_type` of the first member
    #[serde(rename = "type")]
    pub gizmo_type: Option<String>,
    /// Member conversation ids, in archive order
    pub conversation_ids: Vec<String>,
}

impl ProjectRow {
    pub fn from_project(project: &Project<'_>) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.display_name(),
            conversation_count: project.conversation_count(),
            gizmo_type: project.gizmo_type.map(str::to_string),
            conversation_ids: project
                .conversations
                .iter()
                .filter_map(|r| r.id())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Project size bucket (by conversation count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeBucket {
    One,
    TwoToFive,
    SixToTen,
    ElevenToTwenty,
    TwentyOnePlus,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 5] = [
        SizeBucket::One,
        SizeBucket::TwoToFive,
        SizeBucket::SixToTen,
        SizeBucket::ElevenToTwenty,
        SizeBucket::TwentyOnePlus,
    ];

    pub fn for_size(size: usize) -> Self {
        match size {
            0 | 1 => SizeBucket::One,
            2..=5 => SizeBucket::TwoToFive,
            6..=10 => SizeBucket::SixToTen,
            11..=20 => SizeBucket::ElevenToTwenty,
            _ => SizeBucket::TwentyOnePlus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeBucket::One => "1",
            SizeBucket::TwoToFive => "2-5",
            SizeBucket::SixToTen => "6-10",
            SizeBucket::ElevenToTwenty => "11-20",
            SizeBucket::TwentyOnePlus => "21+",
        }
    }
}

/// Aggregate statistics over project sizes.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSizeStats {
    pub total_projects: usize,
    pub average: f64,
    pub largest: usize,
    pub smallest: usize,
    /// Projects per bucket, in [`SizeBucket::ALL`] order
    pub distribution: [(SizeBucket, usize); 5],
}

impl ProjectSizeStats {
    /// `None` when there are no projects.
    pub fn compute(index: &ProjectIndex<'_>) -> Option<Self> {
        let sizes: Vec<usize> = index.iter().map(Project::conversation_count).collect();
        let largest = *sizes.iter().max()?;
        let smallest = *sizes.iter().min()?;

        let mut distribution = SizeBucket::ALL.map(|bucket| (bucket, 0));
        for &size in &sizes {
            let bucket = SizeBucket::for_size(size);
            if let Some((_, count)) = distribution.iter_mut().find(|(b, _)| *b == bucket) {
                *count += 1;
            }
        }

        Some(Self {
            total_projects: sizes.len(),
            average: sizes.iter().sum::<usize>() as f64 / sizes.len() as f64,
            largest,
            smallest,
            distribution,
        })
    }
}

/// Gizmo metadata across all conversations (project members or not).
#[derive(Debug, Clone, Default, Serialize)]
pub struct GizmoSummary {
    /// Distinct `gizmo_id` values
    pub unique_gizmo_ids: usize,
    /// (`gizmo_type`, conversations), most common first
    pub gizmo_types: Vec<(String, usize)>,
    /// Distinct `conversation_template_id` values
    pub unique_template_ids: usize,
}

pub fn gizmo_summary(archive: &Archive) -> GizmoSummary {
    let mut gizmo_ids: Vec<&str> = Vec::new();
    let mut template_ids: Vec<&str> = Vec::new();
    let mut gizmo_types = Tally::default();

    for record in archive.records() {
        if let Some(id) = record.gizmo_id() {
            if !gizmo_ids.contains(&id) {
                gizmo_ids.push(id);
            }
        }
        if let Some(kind) = record.gizmo_type() {
            gizmo_types.add(kind);
        }
        if let Some(template) = record.template_id() {
            if !template_ids.contains(&template) {
                template_ids.push(template);
            }
        }
    }

    GizmoSummary {
        unique_gizmo_ids: gizmo_ids.len(),
        gizmo_types: gizmo_types.into_sorted(),
        unique_template_ids: template_ids.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn members(gizmo_id: &str, n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({"id": format!("{}-{}", gizmo_id, i), "gizmo_id": gizmo_id}))
            .collect()
    }

    #[test]
    fn test_size_buckets() {
        assert_eq!(SizeBucket::for_size(1), SizeBucket::One);
        assert_eq!(SizeBucket::for_size(5), SizeBucket::TwoToFive);
        assert_eq!(SizeBucket::for_size(6), SizeBucket::SixToTen);
        assert_eq!(SizeBucket::for_size(20), SizeBucket::ElevenToTwenty);
        assert_eq!(SizeBucket::for_size(21), SizeBucket::TwentyOnePlus);
        assert_eq!(SizeBucket::TwentyOnePlus.label(), "21+");
    }

    #[test]
    fn test_project_size_stats() {
        let mut entries = members("g-p-a", 1);
        entries.extend(members("g-p-b", 3));
        entries.extend(members("g-p-c", 22));
        entries.push(json!({"id": "standalone"}));
        let archive = Archive::new(entries);
        let index = ProjectIndex::build(&archive);

        let stats = ProjectSizeStats::compute(&index).unwrap();
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.largest, 22);
        assert_eq!(stats.smallest, 1);
        assert!((stats.average - 26.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            stats.distribution.map(|(_, n)| n),
            [1, 1, 0, 0, 1]
        );
    }

    #[test]
    fn test_project_size_stats_empty() {
        let archive = Archive::new(vec![json!({"id": "a"})]);
        let index = ProjectIndex::build(&archive);
        assert!(ProjectSizeStats::compute(&index).is_none());
    }

    #[test]
    fn test_gizmo_summary_counts_all_conversations() {
        let archive = Archive::new(vec![
            json!({"gizmo_id": "g-p-1", "gizmo_type": "snorlax", "conversation_template_id": "g-p-1"}),
            json!({"gizmo_id": "g-p-1", "gizmo_type": "snorlax", "conversation_template_id": "g-p-1"}),
            json!({"gizmo_type": "gpt", "conversation_template_id": "g-abc"}),
        ]);
        let summary = gizmo_summary(&archive);

        assert_eq!(summary.unique_gizmo_ids, 1);
        assert_eq!(summary.unique_template_ids, 2);
        assert_eq!(
            summary.gizmo_types,
            vec![("snorlax".to_string(), 2), ("gpt".to_string(), 1)]
        );
    }

    #[test]
    fn test_project_row() {
        let archive = Archive::new(vec![
            json!({"id": "c1", "title": "Bakery Branding Project", "gizmo_id": "g-p-1", "gizmo_type": "snorlax"}),
            json!({"id": "c2", "title": "Menu", "gizmo_id": "g-p-1"}),
        ]);
        let index = ProjectIndex::build(&archive);
        let row = ProjectRow::from_project(index.get("g-p-1").unwrap());

        assert_eq!(row.name, "Bakery Branding");
        assert_eq!(row.conversation_count, 2);
        assert_eq!(row.gizmo_type.as_deref(), Some("snorlax"));
        assert_eq!(row.conversation_ids, vec!["c1", "c2"]);
    }
}
