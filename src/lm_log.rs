//! Model invocation log.
//!
//! When `--lm-log PATH` is given, every model call made by a workflow is
//! appended to `PATH` as one JSON object per line:
//!
//! ```jsonl
//! {"schema_version":1,"ts":1707900000000,"kind":"generate","backend":"gemini:gemini-1.5-flash","duration_ms":4200,"outcome":"success",...}
//! {"schema_version":1,"ts":1707900004300,"kind":"analyze","backend":"gemini:gemini-1.5-flash","duration_ms":2100,"outcome":"fallback",...}
//! ```
//!
//! `fallback` means the call returned but its output was unusable and the
//! step's default was substituted; `failed` means the call itself errored.

use crate::util::{now_epoch_ms, truncate_string};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Current schema version for log entries.
pub const LM_LOG_SCHEMA_VERSION: u32 = 1;

const PROMPT_PREVIEW_BYTES: usize = 500;

/// Which workflow step made the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LmInvocationKind {
    Generate,
    Analyze,
    FindReferences,
    ExtractClauses,
    NextSteps,
    Validate,
    Chat,
}

impl fmt::Display for LmInvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Generate => "generate",
            Self::Analyze => "analyze",
            Self::FindReferences => "find_references",
            Self::ExtractClauses => "extract_clauses",
            Self::NextSteps => "next_steps",
            Self::Validate => "validate",
            Self::Chat => "chat",
        };
        f.write_str(label)
    }
}

/// Outcome of a model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LmOutcome {
    /// The response was used as returned.
    Success,
    /// The call returned but the step substituted its default.
    Fallback,
    /// The call errored.
    Failed,
}

/// A single log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmLogEntry {
    pub schema_version: u32,

    /// Unix timestamp in milliseconds when the entry was finished.
    pub ts: u64,

    pub kind: LmInvocationKind,

    /// Backend label, e.g. `gemini:gemini-1.5-flash` or `command:llm`.
    pub backend: String,

    pub duration_ms: u64,

    pub outcome: LmOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// First ~500 bytes of the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_preview: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_bytes: Option<usize>,
}

/// Times an invocation and builds its entry.
pub struct LmLogBuilder {
    start: Instant,
    kind: LmInvocationKind,
    backend: String,
    prompt_preview: Option<String>,
    response_bytes: Option<usize>,
}

impl LmLogBuilder {
    pub fn new(kind: LmInvocationKind, backend: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            kind,
            backend: backend.into(),
            prompt_preview: None,
            response_bytes: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        let mut preview = truncate_string(prompt, PROMPT_PREVIEW_BYTES);
        if preview.len() < prompt.len() {
            preview.push_str("...");
        }
        self.prompt_preview = Some(preview);
        self
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.response_bytes = Some(response.len());
        self
    }

    pub fn success(self, summary: impl Into<String>) -> LmLogEntry {
        self.build(LmOutcome::Success, Some(summary.into()), None)
    }

    pub fn fallback(self, reason: impl Into<String>) -> LmLogEntry {
        self.build(LmOutcome::Fallback, None, Some(reason.into()))
    }

    pub fn failed(self, error: impl Into<String>) -> LmLogEntry {
        self.build(LmOutcome::Failed, None, Some(error.into()))
    }

    fn build(self, outcome: LmOutcome, summary: Option<String>, error: Option<String>) -> LmLogEntry {
        LmLogEntry {
            schema_version: LM_LOG_SCHEMA_VERSION,
            ts: now_epoch_ms(),
            kind: self.kind,
            backend: self.backend,
            duration_ms: self.start.elapsed().as_millis() as u64,
            outcome,
            summary,
            error,
            prompt_preview: self.prompt_preview,
            response_bytes: self.response_bytes,
        }
    }
}

/// Append-only JSONL log at a fixed path.
#[derive(Debug, Clone)]
pub struct LmLog {
    path: PathBuf,
}

impl LmLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LmLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory for lm log: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open lm log for append: {}", self.path.display()))?;

        let line = serde_json::to_string(entry).context("serialize lm log entry")?;
        writeln!(file, "{line}").context("write lm log entry")?;
        Ok(())
    }

    /// Append, downgrading failures to a warning; logging never fails a step.
    pub fn record(&self, entry: &LmLogEntry) {
        if let Err(err) = self.append(entry) {
            tracing::warn!(path = %self.path.display(), error = %format!("{err:#}"), "skip lm log entry");
        }
    }

    /// Load every entry; corrupt lines are skipped with a warning.
    pub fn read_entries(&self) -> Result<Vec<LmLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .with_context(|| format!("open lm log: {}", self.path.display()))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("read line {} of lm log", line_num + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LmLogEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!(line = line_num + 1, error = %err, "skip corrupt lm log entry");
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let log = LmLog::new(dir.path().join("nested").join("lm_log.jsonl"));

        let first = LmLogBuilder::new(LmInvocationKind::Generate, "scripted")
            .with_prompt("Please draft")
            .with_response("1. PARTIES")
            .success("generated 10 bytes");
        let second = LmLogBuilder::new(LmInvocationKind::Analyze, "scripted")
            .fallback("response is not valid JSON");

        log.append(&first).unwrap();
        log.append(&second).unwrap();

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, LmInvocationKind::Generate);
        assert_eq!(entries[0].response_bytes, Some(10));
        assert_eq!(entries[1].outcome, LmOutcome::Fallback);
        assert_eq!(entries[1].error.as_deref(), Some("response is not valid JSON"));
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = LmLog::new(dir.path().join("absent.jsonl"));
        assert!(log.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = LmLog::new(dir.path().join("lm_log.jsonl"));
        log.record(&LmLogBuilder::new(LmInvocationKind::Chat, "scripted").failed("timeout"));
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{not json").unwrap();

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, LmOutcome::Failed);
    }

    #[test]
    fn test_prompt_preview_is_bounded() {
        let prompt = "x".repeat(2000);
        let entry = LmLogBuilder::new(LmInvocationKind::Validate, "scripted")
            .with_prompt(&prompt)
            .success("ok");
        let preview = entry.prompt_preview.unwrap();
        assert_eq!(preview.len(), PROMPT_PREVIEW_BYTES + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_kind_display_matches_serde() {
        let json = serde_json::to_string(&LmInvocationKind::FindReferences).unwrap();
        assert_eq!(json, format!("\"{}\"", LmInvocationKind::FindReferences));
    }
}
