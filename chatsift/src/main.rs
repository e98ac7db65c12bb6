//! chatsift - CLI tool to explore ChatGPT conversation exports
//!
//! Loads a `conversations.json` export and reports on its metadata fields,
//! projects, conversations and usage statistics.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/chatsift/config.toml (~/.config/chatsift/config.toml)
//! - Logs: $XDG_STATE_HOME/chatsift/chatsift.log (~/.local/state/chatsift/chatsift.log)

mod export;
mod report;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chatsift_core::{ingest, search, Archive, Config, FieldCategory, SearchCriteria};
use clap::{Parser, Subcommand};
use export::{ExportFormat, ExportType};
use indicatif::{ProgressBar, ProgressStyle};
use report::{ConversationFormat, StatsView};

#[derive(Parser)]
#[command(name = "chatsift")]
#[command(about = "Analyze ChatGPT conversation exports")]
#[command(version)]
struct Args {
    /// Path to conversations.json (default: from config)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Write a log file to the XDG state directory
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full analysis report
    Analyze {
        /// Save the report to a file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List discovered metadata fields
    Fields {
        /// Field category: all, projects, memory, security, user
        #[arg(short, long, default_value = "all")]
        category: FieldCategory,

        /// Show sample values
        #[arg(long)]
        values: bool,
    },

    /// Show projects and their inferred names
    Projects {
        /// Only list derived project names
        #[arg(long)]
        names_only: bool,

        /// Show a breakdown of every project
        #[arg(long)]
        detailed: bool,

        /// Show a single project
        #[arg(long)]
        id: Option<String>,
    },

    /// List conversations
    Conversations {
        /// Show a single conversation
        #[arg(long)]
        id: Option<String>,

        /// Only conversations in this project
        #[arg(short, long)]
        project: Option<String>,

        /// Maximum conversations to show (default: from config)
        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(long, value_enum, default_value_t = ConversationFormat::Summary)]
        format: ConversationFormat,
    },

    /// Search conversations by title or message content
    Search {
        /// Case-insensitive title substring
        #[arg(short, long)]
        title: Option<String>,

        /// Case-insensitive message content substring
        #[arg(short, long)]
        content: Option<String>,

        /// Restrict to a project (exact gizmo_id)
        #[arg(short, long)]
        project: Option<String>,

        /// Restrict to a default model (exact slug)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show usage statistics
    Stats {
        /// Conversations per model
        #[arg(long, conflicts_with_all = ["timeline", "projects"])]
        model_usage: bool,

        /// Conversations per month
        #[arg(long, conflicts_with = "projects")]
        timeline: bool,

        /// Project size distribution
        #[arg(long)]
        projects: bool,
    },

    /// Export data to a file
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        #[arg(short = 't', long = "type", value_enum, default_value_t = ExportType::Conversations)]
        kind: ExportType,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;

    // Keep the guard alive for the whole run so buffered lines are flushed
    let _log_guard = if args.verbose {
        Some(chatsift_core::logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    if Config::file_exists() {
        tracing::info!(path = %Config::config_path().display(), "Loaded config file");
    } else {
        tracing::info!(
            path = %Config::config_path().display(),
            "No config file found, using defaults"
        );
    }

    let path = args.file.unwrap_or_else(|| config.archive.path.clone());
    tracing::info!(path = %path.display(), "chatsift starting");

    let archive = load_with_spinner(&path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Analyze { output } => cmd_analyze(&mut out, &archive, &path, output.as_deref()),
        Command::Fields { category, values } => report::fields(&mut out, &archive, category, values),
        Command::Projects {
            names_only,
            detailed,
            id,
        } => report::projects(&mut out, &archive, names_only, detailed, id.as_deref()),
        Command::Conversations {
            id,
            project,
            limit,
            format,
        } => report::conversations(
            &mut out,
            &archive,
            id.as_deref(),
            project.as_deref(),
            limit.unwrap_or(config.conversations.default_limit),
            format,
        ),
        Command::Search {
            title,
            content,
            project,
            model,
        } => {
            let criteria = SearchCriteria {
                title,
                content,
                project_id: project,
                model,
            };
            let hits = search(&archive, &criteria);
            report::search_results(
                &mut out,
                &hits,
                criteria.has_queries(),
                config.search.result_limit,
            )
        }
        Command::Stats {
            model_usage,
            timeline,
            projects,
        } => {
            let view = if model_usage {
                StatsView::ModelUsage
            } else if timeline {
                StatsView::Timeline
            } else if projects {
                StatsView::Projects
            } else {
                StatsView::General
            };
            report::stats(&mut out, &archive, view)
        }
        Command::Export {
            format,
            kind,
            output,
        } => {
            export::export(&archive, kind, format, &output)?;
            writeln!(out, "Exported to {}", output.display())?;
            Ok(())
        }
    }
}

fn load_with_spinner(path: &Path) -> Result<Archive> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result =
        ingest::load_archive(path).with_context(|| format!("failed to load {}", path.display()));
    spinner.finish_and_clear();
    result
}

fn cmd_analyze(
    out: &mut dyn Write,
    archive: &Archive,
    path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let Some(output) = output else {
        return report::analysis(out, archive, &file_name);
    };

    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    report::analysis(&mut writer, archive, &file_name)?;
    writer.flush()?;

    writeln!(out, "Full report saved to: {}", output.display())?;
    Ok(())
}
