//! Axum route handlers for the Screening API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use secrecy::SecretString;
use tracing::info;

use crate::errors::AppError;
use crate::screening::pipeline::{
    require_credential, run_screening, ScreeningReport, ScreeningRequest,
};
use crate::state::AppState;

/// Header carrying the caller's model API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// POST /api/v1/screenings
///
/// Multipart form: `job_description`, `candidate_name`, `resume` (PDF file).
/// The API key comes from the `x-api-key` header, else the configured default.
/// Runs extract → evaluate → draft and returns the report.
pub async fn handle_screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    // Credential first: nothing is read or parsed without one.
    let api_key = require_credential(
        header_credential(&headers).or_else(|| state.config.gemini_api_key.clone()),
    )?;

    let request = read_screening_form(multipart).await?;

    info!(
        "Screening request: jd_len={}, resume_bytes={}",
        request.job_description.len(),
        request.resume_pdf.len()
    );

    let model = state.models.connect(api_key);
    let report = run_screening(&request, state.pdf.clone(), model.as_ref()).await?;

    Ok(Json(report))
}

fn header_credential(headers: &HeaderMap) -> Option<SecretString> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| SecretString::new(v.to_string()))
}

/// Collects the known form fields. Unknown fields are ignored.
async fn read_screening_form(mut multipart: Multipart) -> Result<ScreeningRequest, AppError> {
    let mut job_description = String::new();
    let mut candidate_name = String::new();
    let mut resume_pdf = Bytes::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => job_description = read_text(field).await?,
            "candidate_name" => candidate_name = read_text(field).await?,
            "resume" => {
                resume_pdf = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read resume", e))?
            }
            _ => {}
        }
    }

    Ok(ScreeningRequest {
        job_description,
        candidate_name: candidate_name.trim().to_string(),
        resume_pdf,
    })
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| multipart_error(&format!("Failed to read field '{name}'"), e))
}

/// A body over the upload limit surfaces as a multipart read error; keep its 413.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}
