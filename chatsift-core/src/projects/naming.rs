//! Project name inference
//!
//! Exports identify projects only by an opaque `gizmo_id`. A readable name
//! has to be guessed from the titles of the project's conversations, which
//! are short, noisy and often auto-generated. Four heuristics are tried in
//! order and the first one that produces anything wins:
//!
//! 1. **Pattern**: titles shaped like "X - Project", "Project: X",
//!    "X Project", "A & B" or "X Plan/Strategy/Trip/Story". Every title is
//!    tried against every pattern and all hits are kept.
//! 2. **Keyword**: the first non-generic title mentioning a project-ish
//!    keyword (plan, app, design, ...).
//! 3. **Common words**: words that recur across several titles, title-cased.
//!    Needs more than two titles.
//! 4. **Longest title**: the wordiest title, if it is of a sensible length.
//!
//! Inference may legitimately find nothing. Callers that need a label use
//! [`fallback_name`], which is deliberately kept out of [`infer_names`] so
//! that "no candidates" stays observable.
//!
//! The pattern, keyword and stopword tables are plain data so each entry can
//! be exercised on its own.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Title shapes that embed a project name, tried in order (case-insensitive).
pub const PROJECT_PATTERNS: &[&str] = &[
    // "Something - Project", "Something: Project notes"
    r"^(.*?)\s*[:-]\s*Project",
    // "Project - Something"
    r"^Project\s*[:-]\s*(.*)$",
    // "Something Project"
    r"^(.*?)\s+Project\s*$",
    // "Brand & Theme"
    r"^(.*?)\s*&\s*(.*)$",
    // "Paris Trip", "Launch Strategy"
    r"^(.*?)\s+(Plan|Planning|Strategy|Trip|Story|Stories)$",
];

/// Titles that say nothing about the project (compared lowercased, exactly).
pub const GENERIC_TITLES: &[&str] = &["new chat", "chat", "discussion"];

/// Substrings that make a title read like a project name.
pub const PROJECT_KEYWORDS: &[&str] = &[
    "plan",
    "strategy",
    "system",
    "platform",
    "app",
    "tool",
    "design",
    "development",
];

/// Words ignored when looking for recurring title words.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "chat", "new", "how", "what", "why",
    "when", "where", "who", "can", "will", "should",
];

/// Accepted length (in characters) of a pattern-extracted name.
pub const PATTERN_NAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

/// Titles inspected by the common-words stage.
pub const COMMON_WORD_TITLE_LIMIT: usize = 8;

/// Tokens must be longer than this to count as words.
const MIN_WORD_LEN: usize = 3;

/// Recurring words joined into a name.
const MAX_COMMON_WORDS: usize = 3;

/// Longest-title fallback bounds (exclusive, in characters).
const LONGEST_TITLE_MIN: usize = 10;
const LONGEST_TITLE_MAX: usize = 40;

/// Prefix of the id-derived name used when inference finds nothing.
pub const FALLBACK_PREFIX: &str = "Project";

static COMPILED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PROJECT_PATTERNS
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap()
        })
        .collect()
});

/// Heuristic that produced a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStage {
    Pattern,
    Keyword,
    CommonWords,
    LongestTitle,
}

impl InferenceStage {
    /// Stages in the order they are tried.
    pub const ORDER: [InferenceStage; 4] = [
        InferenceStage::Pattern,
        InferenceStage::Keyword,
        InferenceStage::CommonWords,
        InferenceStage::LongestTitle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceStage::Pattern => "pattern",
            InferenceStage::Keyword => "keyword",
            InferenceStage::CommonWords => "common_words",
            InferenceStage::LongestTitle => "longest_title",
        }
    }
}

impl std::fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Candidates together with the stage that found them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inference {
    /// `None` when no stage produced a candidate
    pub stage: Option<InferenceStage>,
    /// Distinct candidates in discovery order
    pub candidates: Vec<String>,
}

/// Infer candidate project names from a title set.
///
/// Titles are expected distinct and in first-seen order; the order decides
/// which title wins in the keyword and longest-title stages. Returns an
/// empty vector when nothing plausible is found.
pub fn infer_names(titles: &[&str]) -> Vec<String> {
    infer_with_stage(titles).candidates
}

/// Like [`infer_names`], also reporting which stage succeeded.
pub fn infer_with_stage(titles: &[&str]) -> Inference {
    for stage in InferenceStage::ORDER {
        let candidates = run_stage(stage, titles);
        if !candidates.is_empty() {
            tracing::debug!(%stage, count = candidates.len(), "Project name inferred");
            return Inference {
                stage: Some(stage),
                candidates,
            };
        }
    }

    Inference::default()
}

fn run_stage(stage: InferenceStage, titles: &[&str]) -> Vec<String> {
    match stage {
        InferenceStage::Pattern => pattern_names(titles),
        InferenceStage::Keyword => keyword_title(titles).into_iter().collect(),
        InferenceStage::CommonWords => common_words_name(titles).into_iter().collect(),
        InferenceStage::LongestTitle => longest_title(titles).into_iter().collect(),
    }
}

/// Synthetic label for a project with no inferable name.
///
/// Uses the first 8 characters of the last `-`-separated segment of the id,
/// e.g. `g-p-67f6f442bec0...` becomes `Project 67f6f442`.
pub fn fallback_name(project_id: &str) -> String {
    let tail = project_id.rsplit('-').next().unwrap_or(project_id);
    let short: String = tail.chars().take(8).collect();
    format!("{} {}", FALLBACK_PREFIX, short)
}

// ============================================
// Stage 1: patterns
// ============================================

fn pattern_names(titles: &[&str]) -> Vec<String> {
    let mut names = Vec::new();
    for title in titles {
        for pattern in COMPILED_PATTERNS.iter() {
            if let Some(name) = pattern_candidate(pattern, title) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

/// Name extracted by one pattern from one title, if acceptable.
fn pattern_candidate(pattern: &Regex, title: &str) -> Option<String> {
    let captures = pattern.captures(title)?;
    let first = captures.get(1).map_or("", |m| m.as_str().trim());
    let second = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());

    let raw = match second {
        Some(second) => format!("{} {}", first, second),
        None => first.to_string(),
    };
    // Length applies to the extraction as matched, before quotes are removed
    if !PATTERN_NAME_LEN.contains(&raw.chars().count()) {
        return None;
    }

    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

// ============================================
// Stage 2: keyword titles
// ============================================

fn keyword_title(titles: &[&str]) -> Option<String> {
    titles
        .iter()
        .map(|title| (title, title.to_lowercase()))
        .filter(|(_, lower)| !GENERIC_TITLES.contains(&lower.as_str()))
        .find(|(_, lower)| PROJECT_KEYWORDS.iter().any(|k| lower.contains(k)))
        .map(|(title, _)| title.to_string())
}

// ============================================
// Stage 3: common words
// ============================================

fn common_words_name(titles: &[&str]) -> Option<String> {
    if titles.len() <= 2 {
        return None;
    }

    // (word, number of titles containing it), in discovery order
    let mut counts: Vec<(String, usize)> = Vec::new();
    for title in titles.iter().take(COMMON_WORD_TITLE_LIMIT) {
        let mut seen: Vec<String> = Vec::new();
        for word in title.split_whitespace().map(str::to_lowercase) {
            if word.chars().count() <= MIN_WORD_LEN
                || STOPWORDS.contains(&word.as_str())
                || seen.contains(&word)
            {
                continue;
            }
            match counts.iter_mut().find(|(w, _)| *w == word) {
                Some((_, count)) => *count += 1,
                None => counts.push((word.clone(), 1)),
            }
            seen.push(word);
        }
    }

    let mut common: Vec<_> = counts.into_iter().filter(|(_, count)| *count >= 2).collect();
    // Stable: ties keep discovery order
    common.sort_by(|a, b| b.1.cmp(&a.1));

    let words: Vec<&str> = common
        .iter()
        .take(MAX_COMMON_WORDS)
        .map(|(w, _)| w.as_str())
        .collect();
    if words.is_empty() {
        return None;
    }
    Some(title_case(&words.join(" ")))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

// ============================================
// Stage 4: longest title
// ============================================

fn longest_title(titles: &[&str]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &title in titles {
        let words = title.split_whitespace().count();
        if best.map_or(true, |(_, most)| words > most) {
            best = Some((title, words));
        }
    }

    let (title, _) = best?;
    let len = title.chars().count();
    (len > LONGEST_TITLE_MIN && len < LONGEST_TITLE_MAX).then(|| title.to_string())
}
