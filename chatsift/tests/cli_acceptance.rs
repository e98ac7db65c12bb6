use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    archive: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let archive = seed_archive_fixture(&base);

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            archive,
        }
    }

    fn write_config(&self, contents: &str) {
        let dir = self.xdg_config.join("chatsift");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }

    fn path(&self, name: &str) -> PathBuf {
        self._temp_dir.path().join(name)
    }
}

fn seed_archive_fixture(base: &Path) -> PathBuf {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../chatsift-core/tests/fixtures/conversations.json");
    let target = base.join("export").join("conversations.json");

    fs::create_dir_all(target.parent().expect("missing fixture parent"))
        .expect("failed to create export directory");
    fs::copy(source, &target).expect("failed to copy archive fixture");
    target
}

/// Run `chatsift` against the seeded archive.
fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let archive = env.archive.to_string_lossy().into_owned();
    let mut full_args = vec!["--file", archive.as_str()];
    full_args.extend_from_slice(args);
    run_raw(env, &full_args)
}

fn run_raw(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("chatsift"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute chatsift: {e}"))
}

fn assert_success(args: &[&str], output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return stdout;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "chatsift {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn analyze_prints_full_report() {
    let env = CliTestEnv::new();
    let args = ["analyze"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("CHATGPT ARCHIVE ANALYSIS REPORT"));
    assert!(stdout.contains("File: conversations.json"));
    assert!(stdout.contains("Total conversations: 7"));
    assert!(stdout.contains("Conversations with projects: 4"));
    assert!(stdout.contains("Standalone conversations: 3"));
    assert!(stdout.contains("• Bakery Branding (g-p-aaaa1111): 2 conversations"));
    assert!(stdout.contains("SECURITY & ACCESS FIELDS:"));
    assert!(stdout.contains("• safe_urls: present in 1 conversations"));
}

#[test]
fn analyze_output_writes_report_file() {
    let env = CliTestEnv::new();
    let report = env.path("report.txt");
    let report_arg = report.to_string_lossy().into_owned();
    let args = ["analyze", "--output", report_arg.as_str()];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("Full report saved to:"));
    let contents = fs::read_to_string(&report).expect("report should exist");
    assert!(contents.contains("PROJECT ANALYSIS:"));
}

#[test]
fn projects_lists_inferred_names() {
    let env = CliTestEnv::new();
    let args = ["projects", "--names-only"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("• Bakery Branding (2 conversations)"));
    assert!(stdout.contains("• Project bbbb2222 (2 conversations)"));

    let args = ["projects", "--id", "g-p-missing"];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("Project g-p-missing not found"));
}

#[test]
fn search_reports_matches() {
    let env = CliTestEnv::new();
    let args = ["search", "--content", "budget"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("Found 1 matching conversations:"));
    assert!(stdout.contains("1. Finance notes"));
    assert!(stdout.contains("Matches: content: budget"));
}

#[test]
fn search_respects_configured_result_limit() {
    let env = CliTestEnv::new();
    env.write_config("[search]\nresult_limit = 1\n");
    let args = ["search", "--title", "e"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("Found 4 matching conversations:"));
    assert!(stdout.contains("... and 3 more results"));
}

#[test]
fn conversations_respects_limit_and_project() {
    let env = CliTestEnv::new();
    let args = ["conversations", "--project", "g-p-aaaa1111", "--limit", "1"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("Found 2 conversations in project g-p-aaaa1111"));
    assert!(stdout.contains("Bakery Branding Project"));
    assert!(!stdout.contains("Menu ideas"));
}

#[test]
fn stats_model_usage() {
    let env = CliTestEnv::new();
    let args = ["stats", "--model-usage"];
    let stdout = assert_success(&args, &run(&env, &args));

    assert!(stdout.contains("Total messages: 8"));
    assert!(stdout.contains("gpt-4o: 3 conversations (42.9%)"));
    assert!(stdout.contains("o1: 1 conversations (14.3%)"));
}

#[test]
fn export_projects_json() {
    let env = CliTestEnv::new();
    let target = env.path("projects.json");
    let target_arg = target.to_string_lossy().into_owned();
    let args = ["export", "--type", "projects", "--format", "json", "--output", target_arg.as_str()];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("Exported to"));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).expect("export should exist"))
            .expect("export should be JSON");
    assert_eq!(exported["g-p-aaaa1111"]["name"], "Bakery Branding");
    assert_eq!(exported["g-p-bbbb2222"]["conversation_count"], 2);
}

#[test]
fn export_conversations_csv() {
    let env = CliTestEnv::new();
    let target = env.path("conversations.csv");
    let target_arg = target.to_string_lossy().into_owned();
    let args = ["export", "--format", "csv", "--output", target_arg.as_str()];
    assert_success(&args, &run(&env, &args));

    let csv = fs::read_to_string(&target).expect("export should exist");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("ID,Title,Create Time,Project ID,Message Count"));
    assert_eq!(lines.count(), 6);
}

#[test]
fn verbose_log_records_config_outcome() {
    let env = CliTestEnv::new();
    let args = ["--verbose", "stats"];
    assert_success(&args, &run(&env, &args));

    let log_dir = env.xdg_state.join("chatsift");
    let log = fs::read_dir(&log_dir)
        .expect("log directory should exist")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("chatsift.log"))
        .map(|entry| fs::read_to_string(entry.path()).expect("failed to read log"))
        .collect::<String>();

    assert!(log.contains("No config file found, using defaults"), "log was:\n{log}");
    assert!(log.contains("Archive loaded"), "log was:\n{log}");
}

#[test]
fn missing_archive_fails_with_error() {
    let env = CliTestEnv::new();
    let missing = env.path("nope.json");
    let missing_arg = missing.to_string_lossy().into_owned();
    let args = ["--file", missing_arg.as_str(), "stats"];
    let output = run_raw(&env, &args);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"), "stderr was:\n{stderr}");
}
