//! Evaluation adapter — the one place that reads the Evaluator's free-form reply.
//!
//! The model is asked for `SCORE: <int>` and `REASONING: <text>` lines but is
//! free to ignore that. Extraction is best effort: a missing or malformed score
//! becomes 0 and the result is marked as a fallback.

use std::num::IntErrorKind;

use serde::Serialize;
use tracing::warn;

use crate::screening::prompts::INVITE_THRESHOLD;

const SCORE_MARKER: &str = "SCORE:";
const REASONING_MARKER: &str = "REASONING:";

/// Score substituted when the reply has no parsable score line.
pub const FALLBACK_SCORE: i64 = 0;

/// Where an `EvaluationResult`'s score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Parsed,
    Fallback,
}

/// Structured view of the Evaluator's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub score: i64,
    pub score_source: ScoreSource,
    pub reasoning: Option<String>,
    /// The reply exactly as the model returned it.
    pub raw: String,
}

impl EvaluationResult {
    pub fn from_model_output(raw: impl Into<String>) -> Self {
        let raw = raw.into();

        let (score, score_source) = match extract_score(&raw) {
            Some(score) => (score, ScoreSource::Parsed),
            None => {
                warn!(
                    "Evaluation reply has no parsable score line; using fallback score {}",
                    FALLBACK_SCORE
                );
                (FALLBACK_SCORE, ScoreSource::Fallback)
            }
        };

        if score_source == ScoreSource::Parsed && !(0..=100).contains(&score) {
            warn!("Evaluation score {} is outside 0..=100", score);
        }

        Self {
            score,
            score_source,
            reasoning: extract_reasoning(&raw),
            raw,
        }
    }

    /// Mirrors the Communicator rule: strictly above the threshold.
    pub fn invite_recommended(&self) -> bool {
        self.score > INVITE_THRESHOLD
    }
}

/// Text after the first `marker`, up to the next line break, trimmed.
fn marker_line<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(marker)?;
    Some(rest.lines().next().unwrap_or("").trim())
}

/// Parses the integer after the first `SCORE:` marker.
/// Returns `None` when the marker is missing or the value is not an integer.
/// Integers too large for `i64` saturate so they still count as parsed.
pub fn extract_score(text: &str) -> Option<i64> {
    let value = marker_line(text, SCORE_MARKER)?;
    match value.parse::<i64>() {
        Ok(score) => Some(score),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Extracts the reasoning sentence, if the model supplied one.
pub fn extract_reasoning(text: &str) -> Option<String> {
    marker_line(text, REASONING_MARKER)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
