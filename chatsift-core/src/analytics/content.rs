//! Message content statistics and user-data discovery.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{model_usage, timeline, ModelUsage, Tally};
use crate::format::truncate_chars;
use crate::messages;
use crate::schema::MEMORY_FIELDS;
use crate::types::Archive;

/// Content type reported for content blocks without a `content_type`.
pub const UNKNOWN_CONTENT_TYPE: &str = "unknown";

/// Phrases that mark a message part as talking about the user's profile.
pub const PROFILE_PHRASES: &[&str] = &["user profile", "user information"];

/// Longest excerpt kept for a profile mention, in characters.
pub const EXCERPT_LEN: usize = 200;

/// Aggregate message statistics over the whole archive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStats {
    pub total_messages: usize,
    /// (role, messages), most common first
    pub roles: Vec<(String, usize)>,
    /// (content type, messages), most common first
    pub content_types: Vec<(String, usize)>,
    /// Text characters per message, integer division
    pub average_length: usize,
    pub models: ModelUsage,
    /// Earliest and latest local creation date
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

pub fn content_stats(archive: &Archive) -> ContentStats {
    let mut roles = Tally::default();
    let mut content_types = Tally::default();
    let mut total_messages = 0;
    let mut total_length = 0;

    for record in archive.records() {
        for entry in messages::walk(record) {
            total_messages += 1;
            roles.add(entry.role);
            if entry.has_content() {
                content_types.add(entry.content_type.unwrap_or(UNKNOWN_CONTENT_TYPE));
            }
            total_length += entry.text_len();
        }
    }

    ContentStats {
        total_messages,
        roles: roles.into_sorted(),
        content_types: content_types.into_sorted(),
        average_length: total_length.checked_div(total_messages).unwrap_or(0),
        models: model_usage(archive),
        date_range: timeline(archive).map(|t| (t.earliest, t.latest)),
    }
}

/// A message part that mentions the user's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMention<'a> {
    pub conversation_id: Option<&'a str>,
    pub title: Option<&'a str>,
    /// The part, cut to [`EXCERPT_LEN`] characters
    pub excerpt: String,
}

/// A conversation carrying memory-related fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord<'a> {
    pub conversation_id: Option<&'a str>,
    pub title: Option<&'a str>,
    /// Memory fields present on the record, in [`MEMORY_FIELDS`] order
    pub fields: Vec<(&'a str, &'a Value)>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserData<'a> {
    pub profile_mentions: Vec<ProfileMention<'a>>,
    pub memory_records: Vec<MemoryRecord<'a>>,
}

/// Find profile mentions and memory-scoped conversations.
///
/// Every matching part produces its own mention, so one conversation can
/// appear several times.
pub fn user_data(archive: &Archive) -> UserData<'_> {
    let mut data = UserData::default();

    for record in archive.records() {
        for entry in messages::walk(record) {
            for part in entry.parts {
                let lowered = part.to_lowercase();
                if PROFILE_PHRASES.iter().any(|p| lowered.contains(p)) {
                    data.profile_mentions.push(ProfileMention {
                        conversation_id: record.id(),
                        title: record.title(),
                        excerpt: truncate_chars(part, EXCERPT_LEN),
                    });
                }
            }
        }

        let fields: Vec<_> = MEMORY_FIELDS
            .iter()
            .filter_map(|&field| record.get(field).map(|value| (field, value)))
            .collect();
        if !fields.is_empty() {
            data.memory_records.push(MemoryRecord {
                conversation_id: record.id(),
                title: record.title(),
                fields,
            });
        }
    }

    tracing::debug!(
        profile_mentions = data.profile_mentions.len(),
        memory_records = data.memory_records.len(),
        "User data scanned"
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(role: &str, content_type: Option<&str>, parts: &[&str]) -> Value {
        let mut content = json!({"parts": parts});
        if let Some(kind) = content_type {
            content["content_type"] = json!(kind);
        }
        json!({"message": {"author": {"role": role}, "content": content}})
    }

    fn archive() -> Archive {
        Archive::new(vec![
            json!({
                "id": "a",
                "title": "Profile",
                "memory_scope": "global_enabled",
                "is_do_not_remember": false,
                "mapping": {
                    "root": {"message": null},
                    "m1": node("user", Some("text"), &["Update my User Profile please"]),
                    "m2": node("assistant", Some("text"), &["Done"])
                }
            }),
            json!({
                "id": "b",
                "mapping": {
                    "m1": node("user", None, &["abcdef"]),
                    "m2": node("tool", Some("code"), &[])
                }
            }),
            json!("junk"),
        ])
    }

    #[test]
    fn test_content_stats() {
        let stats = content_stats(&archive());

        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.roles[0], ("user".to_string(), 2));
        assert_eq!(
            stats.content_types,
            vec![
                ("text".to_string(), 2),
                ("unknown".to_string(), 1),
                ("code".to_string(), 1),
            ]
        );
        // 29 + 4 + 6 + 0 characters over 4 messages
        assert_eq!(stats.average_length, 39 / 4);
        assert!(stats.date_range.is_none());
    }

    #[test]
    fn test_content_stats_empty_archive() {
        let stats = content_stats(&Archive::default());
        assert_eq!(stats.total_messages, 0);
        assert_eq!(stats.average_length, 0);
    }

    #[test]
    fn test_profile_mentions_and_memory() {
        let archive = archive();
        let data = user_data(&archive);

        assert_eq!(data.profile_mentions.len(), 1);
        assert_eq!(data.profile_mentions[0].conversation_id, Some("a"));
        assert_eq!(data.profile_mentions[0].excerpt, "Update my User Profile please");

        assert_eq!(data.memory_records.len(), 1);
        let names: Vec<_> = data.memory_records[0].fields.iter().map(|(f, _)| *f).collect();
        assert_eq!(names, vec!["memory_scope", "is_do_not_remember"]);
    }

    #[test]
    fn test_long_mention_is_excerpted() {
        let long = format!("user information: {}", "x".repeat(300));
        let archive = Archive::new(vec![json!({
            "id": "c",
            "mapping": {"m1": node("user", Some("text"), &[long.as_str()])}
        })]);
        let data = user_data(&archive);

        let excerpt = &data.profile_mentions[0].excerpt;
        assert_eq!(excerpt.chars().count(), EXCERPT_LEN + 3);
        assert!(excerpt.ends_with("..."));
    }
}
