//! Model-driven workflows.
//!
//! [`DocumentWorkflow`] drafts a document and derives analysis, references,
//! clauses, and next steps from it. [`ValidationWorkflow`] scores a submitted
//! document. Both run their model calls through [`StepRunner`], which owns
//! timing, the optional LM log, and the normalize-or-fallback policy.

mod document;
mod fallbacks;
mod validation;

pub use document::{DocumentPackage, DocumentWorkflow};
pub use validation::ValidationWorkflow;

use crate::document::FieldError;
use crate::lm::ModelClient;
use crate::lm_log::{LmInvocationKind, LmLog, LmLogBuilder, LmLogEntry};
use crate::normalize::{normalize, Normalized, Shape};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid request:\n{}", field_list(.0))]
    InvalidRequest(Vec<FieldError>),
    #[error("workflow is not idle; reset it before starting a new run")]
    NotIdle,
    #[error("failed to generate legal document: {0}")]
    Generation(String),
    #[error("failed to validate document: {0}")]
    Validation(String),
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("  - {err}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a step's value came from the model or from its fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Model,
    Fallback,
}

/// Per-step diagnostics; kept in memory, never shown as part of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: LmInvocationKind,
    pub outcome: StepOutcome,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepReport {
    fn model(step: LmInvocationKind, start: Instant) -> Self {
        Self {
            step,
            outcome: StepOutcome::Model,
            duration_ms: start.elapsed().as_millis() as u64,
            detail: None,
        }
    }

    fn fallback(step: LmInvocationKind, start: Instant, reason: String) -> Self {
        Self {
            step,
            outcome: StepOutcome::Fallback,
            duration_ms: start.elapsed().as_millis() as u64,
            detail: Some(reason),
        }
    }
}

/// Runs single model calls for a workflow.
pub(crate) struct StepRunner<'a> {
    client: &'a dyn ModelClient,
    log: Option<&'a LmLog>,
}

impl<'a> StepRunner<'a> {
    pub(crate) fn new(client: &'a dyn ModelClient, log: Option<&'a LmLog>) -> Self {
        Self { client, log }
    }

    fn record(&self, entry: LmLogEntry) {
        if let Some(log) = self.log {
            log.record(&entry);
        }
    }

    fn builder(&self, step: LmInvocationKind, prompt: &str) -> LmLogBuilder {
        tracing::debug!(%step, prompt_chars = prompt.chars().count(), "calling model");
        LmLogBuilder::new(step, self.client.describe()).with_prompt(prompt)
    }

    /// Free-text call; an error or a blank reply is returned as `Err`.
    pub(crate) fn text(&self, step: LmInvocationKind, prompt: &str) -> Result<(String, StepReport)> {
        let builder = self.builder(step, prompt);
        let start = Instant::now();
        let result = self.client.generate_content(prompt).and_then(|text| {
            if text.trim().is_empty() {
                Err(anyhow!("model returned empty text"))
            } else {
                Ok(text)
            }
        });
        match result {
            Ok(text) => {
                self.record(
                    builder
                        .with_response(&text)
                        .success(format!("{} chars", text.chars().count())),
                );
                Ok((text, StepReport::model(step, start)))
            }
            Err(err) => {
                self.record(builder.failed(format!("{err:#}")));
                Err(err)
            }
        }
    }

    /// JSON call normalized into `T`.
    ///
    /// Unusable output yields `fallback`; only a failed model call is `Err`.
    pub(crate) fn structured<T: DeserializeOwned>(
        &self,
        step: LmInvocationKind,
        prompt: &str,
        shape: Shape,
        fallback: T,
    ) -> Result<(T, StepReport)> {
        let builder = self.builder(step, prompt);
        let start = Instant::now();
        let raw = match self.client.generate_content(prompt) {
            Ok(raw) => raw,
            Err(err) => {
                self.record(builder.failed(format!("{err:#}")));
                return Err(err);
            }
        };

        let builder = builder.with_response(&raw);
        let Normalized { value, diagnostic } = normalize(&raw, shape, fallback);
        let report = match diagnostic {
            Some(reason) => {
                self.record(builder.fallback(reason.clone()));
                StepReport::fallback(step, start, reason)
            }
            None => {
                self.record(builder.success(format!("parsed {shape}")));
                StepReport::model(step, start)
            }
        };
        Ok((value, report))
    }

    /// Like [`structured`](Self::structured), but a failed call also falls back.
    pub(crate) fn tolerant<T: DeserializeOwned>(
        &self,
        step: LmInvocationKind,
        prompt: &str,
        shape: Shape,
        fallback: fn() -> T,
    ) -> (T, StepReport) {
        let start = Instant::now();
        match self.structured(step, prompt, shape, fallback()) {
            Ok(result) => result,
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(%step, error = %reason, "model call failed; substituting fallback");
                (fallback(), StepReport::fallback(step, start, reason))
            }
        }
    }
}
