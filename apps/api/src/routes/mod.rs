pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::review::handlers;
use crate::state::AppState;

/// Room for the non-file form fields and multipart framing on top of the upload limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/reviews", post(handlers::handle_submit_review))
        .route("/api/v1/reviews/:id", get(handlers::handle_get_review))
        .route(
            "/api/v1/reviews/:id/progress",
            get(handlers::handle_get_progress),
        )
        .route(
            "/api/v1/reviews/:id/export/json",
            get(handlers::handle_export_json),
        )
        .route(
            "/api/v1/reviews/:id/export/text",
            get(handlers::handle_export_text),
        )
        .route("/api/v1/guidelines", get(handlers::handle_guidelines))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::{Config, DocumentMode};
    use crate::llm_client::fake::ScriptedInvoker;
    use crate::review::request::Goal;
    use crate::review::session_store::SessionStore;

    const BOUNDARY: &str = "reviewboundary";

    const METRICS_REPLY: &str = r#"```json
{"technical_depth": 80, "project_understanding": 70, "timeline_clarity": 60,
 "innovation_score": 90, "implementation_feasibility": 50,
 "strengths": ["a", "b", "c"], "weaknesses": ["d", "e", "f"]}
```"#;

    const TIMELINE_REPLY: &str = r#"{"Week 1-2": "Community bonding", "Week 3": "Parser"}"#;

    fn state(invoker: ScriptedInvoker) -> (AppState, Arc<ScriptedInvoker>) {
        let invoker = Arc::new(invoker);
        let config = Config {
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            llm_timeout: Duration::from_secs(5),
            max_upload_bytes: 1024,
            document_mode: DocumentMode::Pdf,
            session_ttl: chrono::Duration::minutes(60),
        };
        let state = AppState {
            llm: invoker.clone(),
            config,
            sessions: SessionStore::new(chrono::Duration::minutes(60)),
        };
        (state, invoker)
    }

    fn full_invoker() -> ScriptedInvoker {
        ScriptedInvoker::new()
            .reply(Goal::Metrics, METRICS_REPLY)
            .reply(Goal::Timeline, TIMELINE_REPLY)
            .reply(Goal::Feedback, "Solid plan. Tighten the testing section.")
    }

    fn multipart_body(
        file: Option<(&str, &str, &[u8])>,
        fields: &[(&str, &str)],
    ) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((name, content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn submit_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/reviews")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = state(ScriptedInvoker::new());
        let response = build_router(state)
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_review_end_to_end() {
        let (state, invoker) = state(full_invoker());
        let app = build_router(state);
        let session_id = Uuid::new_v4();
        let sid = session_id.to_string();
        let body = multipart_body(
            Some(("proposal.pdf", "application/pdf", b"%PDF-1.7 body")),
            &[
                ("problem_statement", "Build a JSON parser"),
                ("reviewer_mode", "true"),
                ("session_id", sid.as_str()),
            ],
        );

        let response = app.clone().oneshot(submit_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let review = json_body(response).await;

        assert_eq!(review["session_id"], session_id.to_string());
        assert_eq!(review["overall_score"], 70);
        assert_eq!(review["score_band"], "high");
        assert_eq!(review["mode"], "mentor");
        assert_eq!(review["metrics"]["innovation_score"], 90);
        assert_eq!(review["timeline"]["Week 3"], "Parser");
        assert_eq!(
            review["feedback"],
            "Solid plan. Tighten the testing section."
        );
        assert_eq!(review["notices"].as_array().unwrap().len(), 0);
        assert_eq!(review["document"]["file_name"], "proposal.pdf");

        let goals: Vec<Goal> = invoker.calls().into_iter().map(|(g, _)| g).collect();
        assert_eq!(goals, vec![Goal::Metrics, Goal::Timeline, Goal::Feedback]);

        let progress = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/reviews/{session_id}/progress")))
            .await
            .unwrap();
        let progress = json_body(progress).await;
        assert_eq!(progress["percent"], 100);

        let fetched = app
            .oneshot(get_request(&format!("/api/v1/reviews/{session_id}")))
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(json_body(fetched).await["overall_score"], 70);
    }

    #[tokio::test]
    async fn test_model_outage_still_returns_review() {
        let (state, _) = state(ScriptedInvoker::new());
        let body = multipart_body(
            Some(("proposal.pdf", "application/pdf", b"%PDF-1.4")),
            &[("problem_statement", "")],
        );

        let response = build_router(state)
            .oneshot(submit_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let review = json_body(response).await;
        assert_eq!(review["overall_score"], 20);
        assert_eq!(review["score_band"], "low");
        assert_eq!(review["notices"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_before_any_model_call() {
        let (state, invoker) = state(full_invoker());
        let body = multipart_body(Some(("notes.txt", "text/plain", b"hello")), &[]);

        let response = build_router(state)
            .oneshot(submit_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INTAKE_ERROR");
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_past_body_limit_is_payload_too_large() {
        let (state, invoker) = state(full_invoker());
        let mut data = b"%PDF-1.7\n".to_vec();
        data.resize(FORM_OVERHEAD_BYTES + 2048, b'x');
        let body = multipart_body(
            Some(("big.pdf", "application/pdf", data.as_slice())),
            &[("problem_statement", "x")],
        );

        let response = build_router(state)
            .oneshot(submit_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INTAKE_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("1024 byte upload limit"));
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_just_over_limit_reports_size() {
        let (state, invoker) = state(full_invoker());
        let mut data = b"%PDF-1.7\n".to_vec();
        data.resize(1100, b'x');
        let body = multipart_body(Some(("big.pdf", "application/pdf", data.as_slice())), &[]);

        let response = build_router(state)
            .oneshot(submit_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["error"]["code"], "INTAKE_ERROR");
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unbounded_upload_limit_does_not_overflow() {
        let (mut state, _) = state(ScriptedInvoker::new());
        state.config.max_upload_bytes = usize::MAX;
        let response = build_router(state)
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file_rejected() {
        let (state, invoker) = state(full_invoker());
        let body = multipart_body(None, &[("problem_statement", "x")]);

        let response = build_router(state)
            .oneshot(submit_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_review_is_not_found() {
        let (state, _) = state(ScriptedInvoker::new());
        let app = build_router(state);
        let id = Uuid::new_v4();

        for uri in [
            format!("/api/v1/reviews/{id}"),
            format!("/api/v1/reviews/{id}/progress"),
            format!("/api/v1/reviews/{id}/export/json"),
        ] {
            let response = app.clone().oneshot(get_request(&uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_exports_are_attachments() {
        let (state, _) = state(full_invoker());
        let app = build_router(state);
        let session_id = Uuid::new_v4();
        let sid = session_id.to_string();
        let body = multipart_body(
            Some(("proposal.pdf", "application/pdf", b"%PDF-1.7")),
            &[("session_id", sid.as_str())],
        );
        app.clone().oneshot(submit_request(body)).await.unwrap();

        let response = app
            .clone()
            .oneshot(get_request(&format!(
                "/api/v1/reviews/{session_id}/export/json"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"proposal_review_"));
        assert!(disposition.ends_with(".json\""));

        let export = json_body(response).await;
        let mut keys: Vec<&str> = export
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["feedback", "metrics", "overall_score", "timeline", "timestamp"]
        );

        let response = app
            .oneshot(get_request(&format!(
                "/api/v1/reviews/{session_id}/export/text"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .ends_with(".txt\""));
    }

    #[tokio::test]
    async fn test_guidelines() {
        let (state, _) = state(ScriptedInvoker::new());
        let response = build_router(state)
            .oneshot(get_request("/api/v1/guidelines"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["tips"].as_array().unwrap().len(), 5);
    }
}
