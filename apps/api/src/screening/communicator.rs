//! Communicator Stage — drafts the candidate email from the raw evaluation.
//!
//! The invite/reject decision is left to the model, which reads the score
//! out of the embedded evaluation text.

use crate::llm_client::{GenerativeModel, LlmError};
use crate::screening::prompts::EMAIL_PROMPT_TEMPLATE;

/// Builds the email prompt. The evaluation and name are embedded verbatim.
pub fn build_email_prompt(evaluation: &str, candidate_name: &str) -> String {
    EMAIL_PROMPT_TEMPLATE
        .replace("{evaluation}", evaluation)
        .replace("{candidate_name}", candidate_name)
}

/// Sends the email prompt and returns the drafted body untouched.
pub async fn draft_email(
    model: &dyn GenerativeModel,
    evaluation: &str,
    candidate_name: &str,
) -> Result<String, LlmError> {
    let prompt = build_email_prompt(evaluation, candidate_name);
    model.generate(&prompt).await
}
