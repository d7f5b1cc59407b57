use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Runs the `fomo` binary against a throwaway database in a temporary directory.
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// A command pinned to this harness's database, UTC, and a directory without config.toml.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("fomo").expect("Failed to find fomo binary");
        cmd.current_dir(self.temp_dir.path())
            .env("FOMO_DATABASE_PATH", &self.db_path)
            .env("FOMO_TIMEZONE", "UTC")
            .env_remove("FOMO_DEFAULT_SORT")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// The board as JSON, with every group and the inbox visible.
    pub fn board_json(&self, extra: &[&str]) -> serde_json::Value {
        let mut args = vec!["board", "--json"];
        args.extend_from_slice(extra);
        let output = self.command().args(&args).output().expect("board failed");
        assert!(output.status.success(), "board exited with {:?}", output.status);
        serde_json::from_slice(&output.stdout).expect("board output is not JSON")
    }

    /// Titles of the board's tasks in display order.
    pub fn titles_in_order(&self, extra: &[&str]) -> Vec<String> {
        self.board_json(extra)["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .map(|t| t["title"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Full ID of the first task with the given title.
    pub fn task_id(&self, title: &str) -> String {
        self.board_json(&["--all"])["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .find(|t| t["title"] == title)
            .and_then(|t| t["id"].as_str())
            .unwrap_or_else(|| panic!("no task titled '{}'", title))
            .to_string()
    }
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task").or(predicate::str::contains("Created recurring task"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
