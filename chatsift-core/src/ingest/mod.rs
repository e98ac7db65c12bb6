//! Archive loading
//!
//! Reads a `conversations.json` export into an [`Archive`].
//!
//! ```text
//! ┌───────────────────┐     ┌─────────────┐     ┌─────────────────────┐
//! │ conversations.json│ ──► │ serde_json  │ ──► │ Archive (Vec<Value>)│
//! └───────────────────┘     └─────────────┘     └─────────────────────┘
//! ```
//!
//! Only the top level is validated: it must be a JSON array. What each entry
//! looks like is left to the analyses, which skip anything that is not an
//! object.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatsift_core::ingest;
//!
//! let archive = ingest::load_archive("conversations.json".as_ref())?;
//! println!("{} conversations", archive.len());
//! # Ok::<(), chatsift_core::Error>(())
//! ```

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::Archive;

/// Read and decode an archive file.
pub fn load_archive(path: &Path) -> Result<Archive> {
    let started = std::time::Instant::now();
    let raw = fs::read_to_string(path)?;
    let archive = parse_archive(&raw)?;

    tracing::info!(
        path = %path.display(),
        conversations = archive.len(),
        malformed = archive.malformed_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Archive loaded"
    );
    Ok(archive)
}

/// Decode an archive from an in-memory JSON document.
pub fn parse_archive(raw: &str) -> Result<Archive> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(entries) => Ok(Archive::new(entries)),
        other => Err(Error::Load(format!(
            "expected a JSON array of conversations, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
