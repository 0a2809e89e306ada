// All LLM prompt templates for the screening stages.
// Placeholders are substituted with `str::replace` before sending.

/// Score above which the Communicator writes an interview invitation.
/// A score equal to the threshold gets a rejection.
pub const INVITE_THRESHOLD: i64 = 60;

/// Evaluator prompt. Replace: {job_description}, {resume_text}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Act as a Senior HR Manager.

JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME:
{resume_text}

Task:
1. Assign a match score (an integer from 0 to 100).
2. Provide a 1-sentence reasoning.

Output strictly in this format, exactly two lines, nothing else:
SCORE: [number]
REASONING: [text]"#;

/// Communicator prompt. Replace: {evaluation}, {candidate_name}
///
/// The rule lines must keep the strict `> 60` comparison; the model applies it.
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"You are an HR Assistant. Based on this evaluation:
{evaluation}

Rules:
- If SCORE > 60: Write an invite to interview.
- Otherwise (SCORE of 60 or lower): Write a polite rejection.
- Use the name "{candidate_name}".

Output ONLY the email body."#;
