pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screenings", post(handlers::handle_screen))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::tests::{BrokenPdf, FixedPages, PDF_BYTES};
    use crate::extraction::PageTextSource;
    use crate::llm_client::{GenerativeModel, ModelProvider};
    use crate::screening::pipeline::tests::StubModel;

    const BOUNDARY: &str = "autohr-test-boundary";

    struct StubProvider(StubModel);

    impl ModelProvider for StubProvider {
        fn connect(&self, _api_key: SecretString) -> Box<dyn GenerativeModel> {
            Box::new(self.0.clone())
        }
    }

    fn config(default_key: Option<&str>) -> Config {
        Config {
            gemini_api_key: default_key.map(|k| SecretString::new(k.to_string())),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(model: StubModel, pdf: Arc<dyn PageTextSource>, default_key: Option<&str>) -> Router {
        build_router(AppState {
            config: config(default_key),
            models: Arc::new(StubProvider(model)),
            pdf,
        })
    }

    fn resume_pages() -> Arc<dyn PageTextSource> {
        Arc::new(FixedPages(vec!["Jane Doe\nRust, Postgres\n".to_string()]))
    }

    fn multipart_body(fields: &[(&str, &str)], resume: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn screening_request(api_key: Option<&str>, body: Vec<u8>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/screenings")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(key) = api_key {
            builder = builder.header(handlers::API_KEY_HEADER, key);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn full_form() -> Vec<u8> {
        multipart_body(
            &[
                ("job_description", "Backend engineer, Rust required."),
                ("candidate_name", "Jane Doe"),
            ],
            Some(PDF_BYTES),
        )
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(StubModel::default(), resume_pages(), None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_screening_success() {
        let model = StubModel::with_replies(vec![
            Ok("SCORE: 72\nREASONING: strong fit".to_string()),
            Ok("Dear Jane Doe,\nWe'd love to talk.".to_string()),
        ]);

        let response = app(model.clone(), resume_pages(), None)
            .oneshot(screening_request(Some("test-key"), full_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["score"], 72);
        assert_eq!(body["score_source"], "parsed");
        assert_eq!(body["reasoning"], "strong fit");
        assert_eq!(body["evaluation"], "SCORE: 72\nREASONING: strong fit");
        assert_eq!(body["invite_recommended"], true);
        assert_eq!(body["email_draft"], "Dear Jane Doe,\nWe'd love to talk.");
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_before_work() {
        let model = StubModel::default();

        let response = app(model.clone(), resume_pages(), None)
            .oneshot(screening_request(None, full_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "CREDENTIAL_ERROR");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_configured_key_used_when_header_absent() {
        let model = StubModel::with_replies(vec![
            Ok("SCORE: 30\nREASONING: weak".to_string()),
            Ok("Dear Jane Doe, thank you.".to_string()),
        ]);

        let response = app(model.clone(), resume_pages(), Some("server-key"))
            .oneshot(screening_request(None, full_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_fields_is_validation_error() {
        let model = StubModel::default();
        let body = multipart_body(&[("job_description", "Rust engineer")], None);

        let response = app(model.clone(), resume_pages(), None)
            .oneshot(screening_request(Some("test-key"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("candidate_name"));
        assert!(message.contains("resume"));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_extraction_error() {
        let model = StubModel::default();

        let response = app(model.clone(), Arc::new(BrokenPdf), None)
            .oneshot(screening_request(Some("test-key"), full_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_reports_stage() {
        let model = StubModel::with_replies(vec![Err(crate::llm_client::LlmError::Api {
            status: 429,
            message: "quota exhausted".to_string(),
        })]);

        let response = app(model.clone(), resume_pages(), None)
            .oneshot(screening_request(Some("test-key"), full_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "SERVICE_ERROR");
        assert_eq!(body["error"]["stage"], "evaluating");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let model = StubModel::default();
        let mut resume = PDF_BYTES.to_vec();
        resume.resize(2 * 1024 * 1024, b' ');
        let body = multipart_body(
            &[
                ("job_description", "Backend engineer, Rust required."),
                ("candidate_name", "Jane Doe"),
            ],
            Some(&resume),
        );

        let response = app(model.clone(), resume_pages(), None)
            .oneshot(screening_request(Some("test-key"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(model.call_count(), 0);
    }
}
