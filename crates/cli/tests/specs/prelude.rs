//! Shared helpers for behavioral specs
//!
//! A `Household` owns a temp directory holding the snapshot file; every
//! `chores` invocation is pointed at it with `--data`. No daemon serves
//! these directories, so each invocation works on the snapshot itself.

#![allow(dead_code)]

use assert_cmd::Command;
pub use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Monday morning every scenario starts from
pub const MONDAY_9AM: &str = "2026-03-02T09:00:00Z";

pub struct Household {
    dir: TempDir,
}

impl Household {
    /// No people and no chores
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Ada, Ben and Cy registered
    pub fn with_people() -> Self {
        let household = Self::empty();
        for (id, name) in [("ada", "Ada"), ("ben", "Ben"), ("cy", "Cy")] {
            household.chores().args(&["assignee", "add", id, name]).passes();
        }
        household
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("chores.json")
    }

    /// Write a file relative to the household dir
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Register a chore from a JSON definition
    pub fn chore(&self, definition: serde_json::Value) {
        let id = definition["id"].as_str().unwrap().to_string();
        let path = self.file(&format!("{id}.json"), &definition.to_string());
        self.chores()
            .args(&["chore", "add", path.to_str().unwrap()])
            .passes();
    }

    /// A `chores` invocation against this household at Monday 09:00
    pub fn chores(&self) -> CliBuilder {
        CliBuilder::new(self.data_path()).at(MONDAY_9AM)
    }

    /// The persisted snapshot as JSON
    pub fn snapshot(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.data_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

pub struct CliBuilder {
    data: PathBuf,
    now: Option<String>,
    args: Vec<String>,
}

impl CliBuilder {
    fn new(data: PathBuf) -> Self {
        Self {
            data,
            now: None,
            args: Vec::new(),
        }
    }

    /// Evaluate at this instant
    pub fn at(mut self, now: &str) -> Self {
        self.now = Some(now.to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_chores"));
        cmd.env("RUST_LOG", "off").arg("--data").arg(&self.data);
        if let Some(now) = &self.now {
            cmd.args(["--now", now]);
        }
        cmd.args(&self.args);
        cmd
    }

    /// Run and expect success
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().unwrap();
        let run = RunAssert::from(output);
        assert!(
            run.success,
            "expected success, got failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }

    /// Run and expect failure
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().unwrap();
        let run = RunAssert::from(output);
        assert!(
            !run.success,
            "expected failure, got success\nstdout:\n{}",
            run.stdout
        );
        run
    }
}

pub struct RunAssert {
    success: bool,
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl RunAssert {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(
            self.stdout.contains(expected),
            "stdout does not contain {expected:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        assert!(
            !self.stdout.contains(unexpected),
            "stdout unexpectedly contains {unexpected:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(
            self.stderr.contains(expected),
            "stderr does not contain {expected:?}\nstderr:\n{}",
            self.stderr
        );
        self
    }
}
