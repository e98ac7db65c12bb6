//! Conversation search
//!
//! A search combines up to four optional criteria:
//!
//! - `title` and `content` are case-insensitive substring queries and are
//!   what a conversation can *match* on,
//! - `project_id` and `model` are exact filters that can only *exclude*.
//!
//! A conversation is returned when it matched at least one substring query
//! and passes every exact filter. Exact filters on their own therefore
//! return nothing; use [`Archive::in_project`] to list a project.

use std::fmt;

use serde::Serialize;

use crate::messages;
use crate::types::{Archive, Record};

/// Search criteria. Empty strings are treated the same as `None`.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub content: Option<String>,
    pub project_id: Option<String>,
    pub model: Option<String>,
}

impl SearchCriteria {
    /// Whether any substring query is set.
    pub fn has_queries(&self) -> bool {
        non_empty(&self.title).is_some() || non_empty(&self.content).is_some()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Which criterion a conversation matched on, carrying the original query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", content = "query", rename_all = "snake_case")]
pub enum MatchKind {
    Title(String),
    Content(String),
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Title(query) => write!(f, "title: {}", query),
            MatchKind::Content(query) => write!(f, "content: {}", query),
        }
    }
}

/// A matching conversation and the criteria it matched.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub record: Record<'a>,
    pub matches: Vec<MatchKind>,
}

/// Criteria prepared for repeated evaluation (queries lowercased once).
#[derive(Debug, Clone)]
pub struct Matcher<'c> {
    title: Option<(&'c str, String)>,
    content: Option<(&'c str, String)>,
    project_id: Option<&'c str>,
    model: Option<&'c str>,
}

impl<'c> Matcher<'c> {
    pub fn new(criteria: &'c SearchCriteria) -> Self {
        let lowered = |q: &'c str| (q, q.to_lowercase());
        Self {
            title: non_empty(&criteria.title).map(lowered),
            content: non_empty(&criteria.content).map(lowered),
            project_id: non_empty(&criteria.project_id),
            model: non_empty(&criteria.model),
        }
    }

    /// Evaluate one conversation.
    pub fn evaluate<'a>(&self, record: Record<'a>) -> Option<SearchHit<'a>> {
        if let Some(project_id) = self.project_id {
            if record.gizmo_id() != Some(project_id) {
                return None;
            }
        }
        if let Some(model) = self.model {
            if record.default_model_slug() != Some(model) {
                return None;
            }
        }

        let mut matches = Vec::new();

        if let Some((query, lowered)) = &self.title {
            let title = record.title().unwrap_or_default();
            if title.to_lowercase().contains(lowered.as_str()) {
                matches.push(MatchKind::Title(query.to_string()));
            }
        }

        if let Some((query, lowered)) = &self.content {
            // First matching part is enough; remaining parts are not scanned
            let found = messages::walk(record)
                .flat_map(|entry| entry.parts)
                .any(|part| part.to_lowercase().contains(lowered.as_str()));
            if found {
                matches.push(MatchKind::Content(query.to_string()));
            }
        }

        if matches.is_empty() {
            return None;
        }
        Some(SearchHit { record, matches })
    }
}

/// Run a search over every well-formed conversation, in archive order.
pub fn search<'a>(archive: &'a Archive, criteria: &SearchCriteria) -> Vec<SearchHit<'a>> {
    let matcher = Matcher::new(criteria);
    let hits: Vec<_> = archive
        .records()
        .filter_map(|record| matcher.evaluate(record))
        .collect();

    tracing::info!(
        hits = hits.len(),
        title = ?criteria.title,
        content = ?criteria.content,
        "Search complete"
    );
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn conversation(id: &str, title: &str, parts: &[&str]) -> Value {
        json!({
            "id": id,
            "title": title,
            "gizmo_id": "g-p-1",
            "default_model_slug": "gpt-4o",
            "mapping": {
                "n1": {"message": {
                    "author": {"role": "user"},
                    "content": {"content_type": "text", "parts": parts}
                }}
            }
        })
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::default()
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let archive = Archive::new(vec![
            conversation("a", "Quarterly BUDGET review", &[]),
            conversation("b", "Recipes", &[]),
        ]);
        let hits = search(
            &archive,
            &SearchCriteria {
                title: Some("budget".into()),
                ..criteria()
            },
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id(), Some("a"));
        assert_eq!(hits[0].matches, vec![MatchKind::Title("budget".into())]);
    }

    #[test]
    fn test_content_match_reported_once() {
        let mut value = conversation("a", "Untitled", &["intro", "nothing here", "the Budget is tight"]);
        value["mapping"]["n2"] = json!({"message": {
            "author": {"role": "assistant"},
            "content": {"content_type": "text", "parts": ["budget again", "and budget"]}
        }});
        let archive = Archive::new(vec![value]);

        let hits = search(
            &archive,
            &SearchCriteria {
                content: Some("budget".into()),
                ..criteria()
            },
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matches, vec![MatchKind::Content("budget".into())]);
    }

    #[test]
    fn test_title_and_content_both_tagged() {
        let archive = Archive::new(vec![conversation("a", "Budget", &["budget lines"])]);
        let hits = search(
            &archive,
            &SearchCriteria {
                title: Some("budget".into()),
                content: Some("lines".into()),
                ..criteria()
            },
        );

        assert_eq!(
            hits[0].matches,
            vec![
                MatchKind::Title("budget".into()),
                MatchKind::Content("lines".into())
            ]
        );
    }

    #[test]
    fn test_exact_filters_veto_matches() {
        let archive = Archive::new(vec![conversation("a", "Budget", &["budget"])]);

        let wrong_project = SearchCriteria {
            title: Some("budget".into()),
            project_id: Some("g-p-2".into()),
            ..criteria()
        };
        assert!(search(&archive, &wrong_project).is_empty());

        let wrong_model = SearchCriteria {
            content: Some("budget".into()),
            model: Some("o1".into()),
            ..criteria()
        };
        assert!(search(&archive, &wrong_model).is_empty());

        let matching_filters = SearchCriteria {
            title: Some("budget".into()),
            project_id: Some("g-p-1".into()),
            model: Some("gpt-4o".into()),
            ..criteria()
        };
        assert_eq!(search(&archive, &matching_filters).len(), 1);
    }

    #[test]
    fn test_filters_alone_match_nothing() {
        let archive = Archive::new(vec![conversation("a", "Budget", &["budget"])]);
        let only_filters = SearchCriteria {
            project_id: Some("g-p-1".into()),
            ..criteria()
        };
        assert!(!only_filters.has_queries());
        assert!(search(&archive, &only_filters).is_empty());
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let archive = Archive::new(vec![conversation("a", "Budget", &[])]);
        let empty = SearchCriteria {
            title: Some(String::new()),
            ..criteria()
        };
        assert!(search(&archive, &empty).is_empty());
    }

    #[test]
    fn test_malformed_entries_and_missing_titles() {
        let archive = Archive::new(vec![json!("oops"), json!({"id": "x"})]);
        let hits = search(
            &archive,
            &SearchCriteria {
                title: Some("x".into()),
                content: Some("x".into()),
                ..criteria()
            },
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_match_kind_display() {
        assert_eq!(MatchKind::Title("plan".into()).to_string(), "title: plan");
        assert_eq!(MatchKind::Content("plan".into()).to_string(), "content: plan");
    }
}
