//! # chatsift-core
//!
//! Core library for chatsift - an analyzer for ChatGPT conversation exports.
//!
//! This library provides:
//! - A typed view over the raw `conversations.json` archive
//! - Schema discovery across conversation records
//! - Message tree walking
//! - Project grouping and project name inference
//! - Conversation search
//! - Statistics aggregators
//! - Configuration and logging infrastructure
//!
//! ## Architecture
//!
//! The archive is loaded once and kept resident. Every analysis is a pure
//! function over it (or over the [`ProjectIndex`] derived from it), so the
//! pieces can be combined freely:
//! - **Raw:** the decoded JSON array ([`Archive`])
//! - **Derived:** [`SchemaProfile`], [`ProjectIndex`], search hits, statistics
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatsift_core::{ingest, ProjectIndex};
//!
//! let archive = ingest::load_archive("conversations.json".as_ref())
//!     .expect("failed to load archive");
//! let projects = ProjectIndex::build(&archive);
//! for project in projects.by_size() {
//!     println!("{} ({} conversations)", project.display_name(), project.conversation_count());
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use projects::{Project, ProjectIndex};
pub use schema::{FieldCategory, SchemaProfile};
pub use search::{search, MatchKind, SearchCriteria, SearchHit};
pub use types::{Archive, Record};

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod messages;
pub mod projects;
pub mod schema;
pub mod search;
pub mod types;
