//! Screening pipeline — runs the three stages strictly in sequence.
//!
//! Flow: extract resume text → evaluate (model call 1) → draft email (model call 2).
//! Each stage starts only after the previous one returns. Any stage error
//! moves the run to `Failed` and aborts; there is no retry and no partial result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, CredentialError};
use crate::extraction::{extract_resume_text_blocking, PageTextSource};
use crate::llm_client::GenerativeModel;
use crate::screening::communicator::draft_email;
use crate::screening::evaluation::{EvaluationResult, ScoreSource};
use crate::screening::evaluator::evaluate_candidate;

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle of a single screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Extracting,
    Evaluating,
    Drafting,
    Complete,
    Failed,
}

impl PipelineState {
    /// The state that follows a successful step. Terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            PipelineState::Idle => PipelineState::Extracting,
            PipelineState::Extracting => PipelineState::Evaluating,
            PipelineState::Evaluating => PipelineState::Drafting,
            PipelineState::Drafting => PipelineState::Complete,
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Extracting => "extracting",
            PipelineState::Evaluating => "evaluating",
            PipelineState::Drafting => "drafting",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        }
    }
}

/// Tracks the state of one run and logs each transition.
struct RunTracker {
    run_id: Uuid,
    state: PipelineState,
}

impl RunTracker {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self) -> PipelineState {
        debug_assert!(!self.state.is_terminal(), "advancing a finished run");
        self.state = self.state.advance();
        info!("Screening {}: {}", self.run_id, self.state.as_str());
        self.state
    }

    /// Marks the run failed and hands the error back for propagation.
    fn fail(&mut self, err: AppError) -> AppError {
        warn!(
            "Screening {} failed while {}: {err}",
            self.run_id,
            self.state.as_str()
        );
        self.state = PipelineState::Failed;
        err
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / report
// ────────────────────────────────────────────────────────────────────────────

/// Every input of a screening run, supplied together before the run starts.
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub job_description: String,
    pub candidate_name: String,
    pub resume_pdf: bytes::Bytes,
}

impl ScreeningRequest {
    /// Rejects blank fields before any work begins.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        if self.job_description.trim().is_empty() {
            missing.push("job_description");
        }
        if self.candidate_name.trim().is_empty() {
            missing.push("candidate_name");
        }
        if self.resume_pdf.is_empty() {
            missing.push("resume");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Output of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub run_id: Uuid,
    pub score: i64,
    pub score_source: ScoreSource,
    pub reasoning: Option<String>,
    /// Raw Evaluator reply.
    pub evaluation: String,
    pub email_draft: String,
    pub invite_recommended: bool,
    pub completed_at: DateTime<Utc>,
}

/// Returns the credential or `CredentialError::Missing` if it is absent or blank.
pub fn require_credential(api_key: Option<SecretString>) -> Result<SecretString, AppError> {
    use secrecy::ExposeSecret;

    api_key
        .filter(|k| !k.expose_secret().trim().is_empty())
        .ok_or(AppError::Credential(CredentialError::Missing))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one screening end to end.
///
/// Steps:
/// 1. extract_resume_text_blocking() → ResumeText (no model call on failure)
/// 2. evaluate_candidate() → raw evaluation text
/// 3. EvaluationResult::from_model_output() → score with zero fallback
/// 4. draft_email() with the raw evaluation text → email body
pub async fn run_screening(
    request: &ScreeningRequest,
    source: Arc<dyn PageTextSource>,
    model: &dyn GenerativeModel,
) -> Result<ScreeningReport, AppError> {
    let mut run = RunTracker::new(Uuid::new_v4());

    if let Err(e) = request.validate() {
        return Err(run.fail(e));
    }

    // Step 1: Extract
    run.advance();
    let resume_text =
        match extract_resume_text_blocking(source, request.resume_pdf.clone()).await {
            Ok(text) => text,
            Err(e) => return Err(run.fail(e.into())),
        };
    info!(
        "Extracted {} bytes of resume text for run {}",
        resume_text.len(),
        run.run_id
    );

    // Step 2: Evaluate
    let stage = run.advance();
    let raw_evaluation =
        match evaluate_candidate(model, &request.job_description, resume_text.as_str()).await {
            Ok(text) => text,
            Err(e) => return Err(run.fail(AppError::from_llm(stage, e))),
        };

    // Step 3: Parse score (lossy, never fails)
    let evaluation = EvaluationResult::from_model_output(raw_evaluation);
    info!(
        "Evaluation score {} ({:?}) for run {}",
        evaluation.score, evaluation.score_source, run.run_id
    );

    // Step 4: Draft
    let stage = run.advance();
    let email_draft = match draft_email(model, &evaluation.raw, &request.candidate_name).await {
        Ok(text) => text,
        Err(e) => return Err(run.fail(AppError::from_llm(stage, e))),
    };

    run.advance();

    Ok(ScreeningReport {
        run_id: run.run_id,
        score: evaluation.score,
        score_source: evaluation.score_source,
        invite_recommended: evaluation.invite_recommended(),
        reasoning: evaluation.reasoning,
        evaluation: evaluation.raw,
        email_draft,
        completed_at: Utc::now(),
    })
}
