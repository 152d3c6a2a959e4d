//! Document health scoring.

use super::{fallbacks, StepReport, StepRunner, WorkflowError};
use crate::document::ValidationResult;
use crate::lm::ModelClient;
use crate::lm_log::{LmInvocationKind, LmLog};
use crate::normalize::Shape;
use crate::prompts;
use std::borrow::Cow;

/// Stands in for the text of a PDF upload; PDF parsing is not supported.
pub const PDF_PLACEHOLDER_TEXT: &str = "PDF content would be extracted here";

const PDF_MAGIC: &[u8] = b"%PDF";

/// Text to score for an uploaded file.
pub fn extract_text(bytes: &[u8]) -> Result<Cow<'_, str>, WorkflowError> {
    if bytes.starts_with(PDF_MAGIC) {
        tracing::warn!("PDF text extraction is not supported; scoring placeholder text");
        return Ok(Cow::Borrowed(PDF_PLACEHOLDER_TEXT));
    }
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        return Err(WorkflowError::Validation("document is empty".to_string()));
    }
    Ok(text)
}

pub struct ValidationWorkflow<'a> {
    steps: StepRunner<'a>,
}

impl<'a> ValidationWorkflow<'a> {
    pub fn with_log(client: &'a dyn ModelClient, log: Option<&'a LmLog>) -> Self {
        Self {
            steps: StepRunner::new(client, log),
        }
    }

    /// Score `bytes` with one model call.
    ///
    /// Unusable output yields the generic review result; a failed call is an
    /// error.
    pub fn validate(&self, bytes: &[u8]) -> Result<ValidationResult, WorkflowError> {
        self.validate_with_report(bytes).map(|(result, _)| result)
    }

    pub fn validate_with_report(
        &self,
        bytes: &[u8],
    ) -> Result<(ValidationResult, StepReport), WorkflowError> {
        let text = extract_text(bytes)?;
        let prompt = prompts::validation_prompt(&text);
        self.steps
            .structured(
                LmInvocationKind::Validate,
                &prompt,
                Shape::Object,
                fallbacks::validation(),
            )
            .map_err(|err| WorkflowError::Validation(format!("{err:#}")))
    }
}
