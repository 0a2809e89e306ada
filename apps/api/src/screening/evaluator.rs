//! Evaluator Stage — asks the model to score a resume against a job description.

use crate::llm_client::{GenerativeModel, LlmError};
use crate::screening::prompts::EVALUATION_PROMPT_TEMPLATE;

/// Builds the evaluation prompt. Both inputs are embedded verbatim.
pub fn build_evaluation_prompt(job_description: &str, resume_text: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

/// Sends the evaluation prompt and returns the model's reply untouched.
/// Structure is not checked here; see `EvaluationResult::from_model_output`.
pub async fn evaluate_candidate(
    model: &dyn GenerativeModel,
    job_description: &str,
    resume_text: &str,
) -> Result<String, LlmError> {
    let prompt = build_evaluation_prompt(job_description, resume_text);
    model.generate(&prompt).await
}
