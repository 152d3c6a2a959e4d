//! Shared test infrastructure for integration tests.
//!
//! Every run gets its own data directory and talks to `tests/mock-lm.sh`
//! instead of Gemini, so tests never touch the network or the user's account
//! store.
#![allow(dead_code)]

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Variables that would otherwise leak the developer's setup into a run.
const SCRUBBED_ENV: &[&str] = &[
    "GEMINI_API_KEY",
    "LEXDRAFT_MODEL",
    "LEXDRAFT_API_BASE",
    "LEXDRAFT_TIMEOUT_SECS",
    "LEXDRAFT_LM_COMMAND",
    "RUST_LOG",
];

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

/// Shell command running the mock model script.
pub fn mock_lm_command() -> String {
    let script = manifest_dir().join("tests/mock-lm.sh");
    shell_words::join(["sh".to_string(), script.display().to_string()])
}

/// An isolated lexdraft installation rooted in a temp directory.
pub struct Sandbox {
    dir: TempDir,
    mode: Option<&'static str>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            mode: None,
        }
    }

    /// Run the mock model in `fail` or `garbage` mode.
    pub fn with_mode(mode: &'static str) -> Self {
        Self {
            mode: Some(mode),
            ..Self::new()
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lexdraft"));
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("LEXDRAFT_DATA_DIR", self.data_dir())
            .env("LEXDRAFT_LM_COMMAND", mock_lm_command());
        match self.mode {
            Some(mode) => cmd.env("MOCK_LM_MODE", mode),
            None => cmd.env_remove("MOCK_LM_MODE"),
        };
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run lexdraft")
    }

    /// Run and require a zero exit status.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "lexdraft {args:?} failed: {}",
            stderr(&output)
        );
        stdout(&output)
    }

    pub fn login_demo(&self) {
        self.run_ok(&["login", "--email", "demo@example.com", "--password", "Demo@123"]);
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Flags for the Acme service agreement used across the generate tests.
pub const ACME_REQUEST: &[&str] = &[
    "generate",
    "--category",
    "contracts",
    "--sub-type",
    "Service Agreement",
    "--jurisdiction",
    "Federal Law",
    "--full-name",
    "Acme Inc",
    "--counterparty",
    "Globex LLC",
    "--details",
    "consulting services, 12 months",
];
