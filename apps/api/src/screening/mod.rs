// Screening: resume extraction, evaluation, email drafting.
// All LLM calls go through llm_client — no direct Gemini HTTP calls here.

pub mod communicator;
pub mod evaluation;
pub mod evaluator;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
