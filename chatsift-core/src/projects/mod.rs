//! Project grouping
//!
//! Conversations created inside a project (or a custom GPT) carry a
//! `gizmo_id`. Grouping folds the archive into one [`Project`] per id,
//! keeping the first-seen `gizmo_type` and template, every member in archive
//! order, and the distinct titles the members contributed. Conversations
//! without a `gizmo_id` are standalone and belong to no project.
//!
//! Names are not part of the export; see [`naming`] for how they are guessed.

pub mod naming;

use std::collections::HashMap;

use crate::types::{Archive, Record};

pub use naming::{
    fallback_name, infer_names, infer_with_stage, Inference, InferenceStage,
};

/// Conversations sharing one `gizmo_id`.
#[derive(Debug, Clone)]
pub struct Project<'a> {
    /// The `gizmo_id`
    pub id: &'a str,
    /// `gizmo_type` of the first member that had one at creation
    pub gizmo_type: Option<&'a str>,
    /// `conversation_template_id` of the first member
    pub template_id: Option<&'a str>,
    /// Members in archive order
    pub conversations: Vec<Record<'a>>,
    titles: Vec<&'a str>,
}

impl<'a> Project<'a> {
    fn new(id: &'a str, first: Record<'a>) -> Self {
        Self {
            id,
            gizmo_type: first.gizmo_type(),
            template_id: first.template_id(),
            conversations: Vec::new(),
            titles: Vec::new(),
        }
    }

    fn push(&mut self, record: Record<'a>) {
        self.conversations.push(record);
        if let Some(title) = record.title() {
            if !self.titles.contains(&title) {
                self.titles.push(title);
            }
        }
    }

    /// Distinct member titles, in first-seen order.
    pub fn titles(&self) -> &[&'a str] {
        &self.titles
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Candidate names inferred from the title set (possibly empty).
    pub fn name_candidates(&self) -> Vec<String> {
        infer_names(&self.titles)
    }

    /// Best inferred name, or the id-derived fallback when inference finds none.
    pub fn display_name(&self) -> String {
        self.name_candidates()
            .into_iter()
            .next()
            .unwrap_or_else(|| fallback_name(self.id))
    }
}

/// All projects of an archive, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex<'a> {
    projects: Vec<Project<'a>>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> ProjectIndex<'a> {
    /// Group the archive's conversations by `gizmo_id`.
    pub fn build(archive: &'a Archive) -> Self {
        let mut index = Self::default();
        for record in archive.records() {
            index.insert(record);
        }

        tracing::info!(
            projects = index.len(),
            conversations = index.conversation_count(),
            "Projects grouped"
        );
        index
    }

    fn insert(&mut self, record: Record<'a>) {
        let Some(gizmo_id) = record.gizmo_id() else {
            return;
        };

        let position = match self.positions.get(gizmo_id) {
            Some(&position) => position,
            None => {
                self.projects.push(Project::new(gizmo_id, record));
                self.positions.insert(gizmo_id, self.projects.len() - 1);
                self.projects.len() - 1
            }
        };
        self.projects[position].push(record);
    }

    /// Look up a project. Unknown ids yield `None`.
    pub fn get(&self, id: &str) -> Option<&Project<'a>> {
        self.positions.get(id).map(|&i| &self.projects[i])
    }

    /// Projects in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &Project<'a>> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects sorted by conversation count, largest first.
    ///
    /// The sort is stable, so equal-sized projects keep first-appearance order.
    pub fn by_size(&self) -> Vec<&Project<'a>> {
        let mut projects: Vec<_> = self.projects.iter().collect();
        projects.sort_by(|a, b| b.conversation_count().cmp(&a.conversation_count()));
        projects
    }

    /// Total conversations that belong to some project.
    pub fn conversation_count(&self) -> usize {
        self.projects.iter().map(Project::conversation_count).sum()
    }
}
