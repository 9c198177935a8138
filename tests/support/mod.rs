use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Empty directory with no store yet.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn init() -> Self {
        let tree = Self::empty();
        tree.cmd().arg("init").assert().success();
        tree
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tasktree"));
        cmd.current_dir(self.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Feed `script` to the interactive shell on stdin.
    pub fn shell(&self, script: &str) -> assert_cmd::assert::Assert {
        self.cmd().write_stdin(script).assert()
    }

    /// Raw JSON record of task `id`.
    pub fn record(&self, id: u64) -> Value {
        let path = self
            .path()
            .join(".tasks")
            .join("tasks")
            .join(format!("{id}.json"));
        let raw = std::fs::read_to_string(path).expect("task record exists");
        serde_json::from_str(&raw).expect("task record is valid json")
    }

    /// Raw text of task `id`, if readable right now.
    pub fn record_text(&self, id: u64) -> Option<String> {
        let path = self
            .path()
            .join(".tasks")
            .join("tasks")
            .join(format!("{id}.json"));
        std::fs::read_to_string(path).ok()
    }

    /// Start the shell with stdin left open for the caller.
    pub fn spawn_shell(&self) -> std::process::Child {
        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("tasktree"));
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());
        cmd.spawn().expect("tasktree shell starts")
    }

    pub fn has_record(&self, id: u64) -> bool {
        self.path()
            .join(".tasks")
            .join("tasks")
            .join(format!("{id}.json"))
            .is_file()
    }
}
