//! Model usage and timeline statistics.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;

use super::{percentage, Tally};
use crate::types::Archive;

/// Conversations per `default_model_slug`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelUsage {
    /// Archive length, used as the percentage base
    pub total_conversations: usize,
    /// (model, conversations), most used first
    pub models: Vec<(String, usize)>,
}

impl ModelUsage {
    /// Share of all conversations, in percent.
    pub fn share(&self, count: usize) -> f64 {
        percentage(count, self.total_conversations)
    }
}

/// Count conversations per default model.
pub fn model_usage(archive: &Archive) -> ModelUsage {
    let mut tally = Tally::default();
    for record in archive.records() {
        if let Some(model) = record.default_model_slug() {
            tally.add(model);
        }
    }

    ModelUsage {
        total_conversations: archive.len(),
        models: tally.into_sorted(),
    }
}

/// Conversation creation dates.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    /// (`YYYY-MM`, conversations), oldest month first
    pub monthly: Vec<(String, usize)>,
}

/// Timeline in the local timezone. `None` when no conversation has a
/// creation time.
pub fn timeline(archive: &Archive) -> Option<Timeline> {
    timeline_in(archive, &Local)
}

/// Timeline with dates computed in `tz`.
pub fn timeline_in<Tz: TimeZone>(archive: &Archive, tz: &Tz) -> Option<Timeline> {
    let dates: Vec<DateTime<Tz>> = archive
        .records()
        .filter_map(|record| record.created_in(tz))
        .collect();

    let earliest = dates.iter().map(|d| d.date_naive()).min()?;
    let latest = dates.iter().map(|d| d.date_naive()).max()?;

    let mut monthly: Vec<(String, usize)> = Vec::new();
    let mut months: Vec<String> = dates
        .iter()
        .map(|d| d.date_naive().format("%Y-%m").to_string())
        .collect();
    months.sort();
    for month in months {
        match monthly.last_mut() {
            Some((last, count)) if *last == month => *count += 1,
            _ => monthly.push((month, 1)),
        }
    }

    Some(Timeline {
        earliest,
        latest,
        monthly,
    })
}
