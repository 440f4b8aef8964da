//! Axum route handlers for the Review API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::DocumentSummary;
use crate::models::review::{MetricsResult, ReviewMode, ScoreBand, TimelineResult};
use crate::review::export::{export_file_name, to_json, to_text_report};
use crate::review::guidelines::{guidelines, Guidelines};
use crate::review::intake::{capture_payload, read_submission, validate_upload};
use crate::review::interpret::StageNotice;
use crate::review::orchestrator::{run_review, ReviewStage};
use crate::review::session_store::StoredReview;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub mode: ReviewMode,
    pub document: DocumentSummary,
    pub overall_score: u32,
    pub score_band: ScoreBand,
    pub metrics: MetricsResult,
    pub timeline: TimelineResult,
    pub feedback: String,
    /// Stages that fell back to their defaults.
    pub notices: Vec<StageNotice>,
}

impl ReviewResponse {
    fn new(session_id: Uuid, stored: StoredReview) -> Self {
        let score_band = stored.session.score_band();
        Self {
            session_id,
            created_at: stored.created_at,
            mode: stored.mode,
            document: stored.document,
            overall_score: stored.session.overall_score,
            score_band,
            metrics: stored.session.metrics,
            timeline: stored.session.timeline,
            feedback: stored.session.feedback,
            notices: stored.notices,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub session_id: Uuid,
    pub percent: u8,
    pub stage: ReviewStage,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reviews
///
/// Multipart submission: validates the upload, runs metrics → timeline → feedback,
/// and stores the resulting session. Model failures degrade to defaults; only
/// intake problems are returned as errors.
pub async fn handle_submit_review(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReviewResponse>, AppError> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    let upload = validate_upload(submission.upload, state.config.max_upload_bytes)?;

    let payload = capture_payload(&upload, state.config.document_mode).await?;

    let session_id = submission.session_id.unwrap_or_else(Uuid::new_v4);
    let mode = ReviewMode::from_flag(submission.reviewer_mode);
    info!("Review {session_id} accepted: {}", payload.describe());

    let reporter = state.sessions.reporter(session_id);
    let outcome = run_review(
        state.llm.as_ref(),
        &payload,
        &submission.problem_statement,
        mode,
        &reporter,
    )
    .await;

    let stored = StoredReview {
        session: outcome.session,
        notices: outcome.notices,
        document: upload.summary(),
        mode,
        created_at: Utc::now(),
    };
    state.sessions.put(session_id, stored.clone());
    info!(
        "Review {session_id} stored ({} live sessions)",
        state.sessions.len()
    );

    Ok(Json(ReviewResponse::new(session_id, stored)))
}

/// GET /api/v1/reviews/:id
pub async fn handle_get_review(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let stored = find_review(&state, session_id)?;
    Ok(Json(ReviewResponse::new(session_id, stored)))
}

/// GET /api/v1/reviews/:id/progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, AppError> {
    let stage = state
        .sessions
        .progress(session_id)
        .ok_or_else(|| AppError::NotFound(format!("No review in progress for {session_id}")))?;
    Ok(Json(ProgressResponse {
        session_id,
        percent: stage.percent(),
        stage,
    }))
}

/// GET /api/v1/reviews/:id/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = find_review(&state, session_id)?;
    let now = Utc::now();
    let body = to_json(&stored.session, now)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize export: {e}")))?;
    Ok(attachment("application/json", export_file_name(now, "json"), body))
}

/// GET /api/v1/reviews/:id/export/text
pub async fn handle_export_text(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = find_review(&state, session_id)?;
    let now = Utc::now();
    let body = to_text_report(&stored.session, now);
    Ok(attachment(
        "text/plain; charset=utf-8",
        export_file_name(now, "txt"),
        body,
    ))
}

/// GET /api/v1/guidelines
pub async fn handle_guidelines() -> Json<Guidelines> {
    Json(guidelines())
}

fn find_review(state: &AppState, session_id: Uuid) -> Result<StoredReview, AppError> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Review {session_id} not found")))
}

fn attachment(content_type: &'static str, file_name: String, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}
