//! Document drafting pipeline.
//!
//! A run moves through a fixed sequence of states, one model call per state:
//!
//! ```text
//! Idle -> Generating -> Analyzing -> FindingReferences
//!      -> ExtractingClauses -> DeterminingNextSteps -> Complete
//! ```
//!
//! Only generation can fail the run (`Generating -> Failed`). The four later
//! steps substitute their fallback when the model output is unusable, so once
//! a document exists the run always completes.

use super::{fallbacks, StepOutcome, StepReport, StepRunner, WorkflowError};
use crate::document::{
    renumber_steps, AnalysisReport, DocumentRequest, GeneratedDocument, KeyClause,
    LegalReference, NextStep,
};
use crate::lm::ModelClient;
use crate::lm_log::{LmInvocationKind, LmLog};
use crate::normalize::Shape;
use crate::prompts;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Generating,
    Analyzing,
    FindingReferences,
    ExtractingClauses,
    DeterminingNextSteps,
    Complete,
    Failed,
}

impl WorkflowState {
    /// The state a successful step leads to; `None` for terminal states.
    pub fn successor(self) -> Option<WorkflowState> {
        match self {
            WorkflowState::Idle => Some(WorkflowState::Generating),
            WorkflowState::Generating => Some(WorkflowState::Analyzing),
            WorkflowState::Analyzing => Some(WorkflowState::FindingReferences),
            WorkflowState::FindingReferences => Some(WorkflowState::ExtractingClauses),
            WorkflowState::ExtractingClauses => Some(WorkflowState::DeterminingNextSteps),
            WorkflowState::DeterminingNextSteps => Some(WorkflowState::Complete),
            WorkflowState::Complete | WorkflowState::Failed => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Generating => "generating",
            WorkflowState::Analyzing => "analyzing",
            WorkflowState::FindingReferences => "finding_references",
            WorkflowState::ExtractingClauses => "extracting_clauses",
            WorkflowState::DeterminingNextSteps => "determining_next_steps",
            WorkflowState::Complete => "complete",
            WorkflowState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Everything one successful run produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPackage {
    pub document: GeneratedDocument,
    pub analysis: AnalysisReport,
    pub references: Vec<LegalReference>,
    pub clauses: Vec<KeyClause>,
    pub next_steps: Vec<NextStep>,
    #[serde(skip)]
    reports: Vec<StepReport>,
}

impl DocumentPackage {
    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// True when any step substituted its fallback.
    pub fn is_degraded(&self) -> bool {
        self.reports
            .iter()
            .any(|report| report.outcome == StepOutcome::Fallback)
    }
}

pub struct DocumentWorkflow<'a> {
    steps: StepRunner<'a>,
    state: WorkflowState,
    transitions: Vec<WorkflowState>,
    reports: Vec<StepReport>,
}

impl<'a> DocumentWorkflow<'a> {
    pub fn with_log(client: &'a dyn ModelClient, log: Option<&'a LmLog>) -> Self {
        Self {
            steps: StepRunner::new(client, log),
            state: WorkflowState::Idle,
            transitions: vec![WorkflowState::Idle],
            reports: Vec::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn transitions(&self) -> &[WorkflowState] {
        &self.transitions
    }

    /// Return to `Idle`, discarding the previous run's history.
    pub fn reset(&mut self) {
        self.state = WorkflowState::Idle;
        self.transitions = vec![WorkflowState::Idle];
        self.reports.clear();
    }

    pub fn run(&mut self, request: DocumentRequest) -> Result<DocumentPackage, WorkflowError> {
        if self.state != WorkflowState::Idle {
            return Err(WorkflowError::NotIdle);
        }

        self.advance();
        let document = match self.generate(request) {
            Ok(document) => document,
            Err(err) => {
                self.enter(WorkflowState::Failed);
                return Err(err);
            }
        };

        self.advance();
        let analysis = self.analyze(&document);
        self.advance();
        let references = self.find_references(&document);
        self.advance();
        let clauses = self.extract_clauses(document.text());
        self.advance();
        let next_steps = self.next_steps(&document);
        self.advance();

        Ok(DocumentPackage {
            document,
            analysis,
            references,
            clauses,
            next_steps,
            reports: self.reports.clone(),
        })
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.successor() {
            self.enter(next);
        }
    }

    fn enter(&mut self, next: WorkflowState) {
        tracing::info!(from = %self.state, to = %next, "workflow transition");
        self.state = next;
        self.transitions.push(next);
    }

    fn generate(&mut self, request: DocumentRequest) -> Result<GeneratedDocument, WorkflowError> {
        let prompt = prompts::generate_prompt(&request);
        let (text, report) = self
            .steps
            .text(LmInvocationKind::Generate, &prompt)
            .map_err(|err| WorkflowError::Generation(format!("{err:#}")))?;
        self.reports.push(report);
        Ok(GeneratedDocument::new(request, text.trim().to_string()))
    }

    fn analyze(&mut self, document: &GeneratedDocument) -> AnalysisReport {
        let prompt = prompts::analysis_prompt(document.text(), document.request());
        let (analysis, report) = self.steps.tolerant(
            LmInvocationKind::Analyze,
            &prompt,
            Shape::Object,
            fallbacks::analysis,
        );
        self.reports.push(report);
        analysis
    }

    fn find_references(&mut self, document: &GeneratedDocument) -> Vec<LegalReference> {
        let prompt = prompts::references_prompt(document.text(), document.request());
        let (references, report) = self.steps.tolerant(
            LmInvocationKind::FindReferences,
            &prompt,
            Shape::Array,
            fallbacks::references,
        );
        self.reports.push(report);
        references
    }

    fn extract_clauses(&mut self, text: &str) -> Vec<KeyClause> {
        let prompt = prompts::clauses_prompt(text);
        let (clauses, report) = self.steps.tolerant(
            LmInvocationKind::ExtractClauses,
            &prompt,
            Shape::ArrayOrWrapped("clauses"),
            fallbacks::clauses,
        );
        self.reports.push(report);
        clauses
    }

    fn next_steps(&mut self, document: &GeneratedDocument) -> Vec<NextStep> {
        let prompt = prompts::next_steps_prompt(document.text(), document.request());
        let (mut steps, report) = self.steps.tolerant(
            LmInvocationKind::NextSteps,
            &prompt,
            Shape::Array,
            fallbacks::next_steps,
        );
        renumber_steps(&mut steps);
        self.reports.push(report);
        steps
    }
}
