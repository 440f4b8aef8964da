//! Review Orchestration: runs the three goals for one submission.
//!
//! Flow: metrics → timeline → feedback, each built, invoked and interpreted on its
//! own. A failing stage falls back to its default and the next stage still runs, so
//! the caller always receives a complete `ReviewSession`.

use serde::Serialize;
use tracing::info;

use crate::llm_client::ModelInvoker;
use crate::models::document::DocumentPayload;
use crate::models::review::{ReviewMode, ReviewSession};
use crate::review::interpret::{
    interpret_feedback, interpret_metrics, interpret_timeline, StageNotice,
};
use crate::review::request::{build_request, Goal};

/// Fixed progress checkpoints, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Started,
    MetricsScored,
    TimelineExtracted,
    FeedbackWritten,
    Complete,
}

impl ReviewStage {
    pub fn percent(self) -> u8 {
        match self {
            ReviewStage::Started => 0,
            ReviewStage::MetricsScored => 40,
            ReviewStage::TimelineExtracted => 70,
            ReviewStage::FeedbackWritten => 90,
            ReviewStage::Complete => 100,
        }
    }
}

/// Receives coarse progress after each stage.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, stage: ReviewStage);
}

impl<F> ProgressReporter for F
where
    F: Fn(ReviewStage) + Send + Sync,
{
    fn report(&self, stage: ReviewStage) {
        self(stage)
    }
}

/// The session plus any stage that had to fall back.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub session: ReviewSession,
    pub notices: Vec<StageNotice>,
}

/// Runs the three stages sequentially and aggregates a `ReviewSession`.
///
/// Never fails: invocation and interpretation errors become stage defaults.
pub async fn run_review(
    invoker: &dyn ModelInvoker,
    document: &DocumentPayload,
    problem_statement: &str,
    mode: ReviewMode,
    progress: &dyn ProgressReporter,
) -> ReviewOutcome {
    info!(
        "Starting review: document={}, mode={:?}",
        document.describe(),
        mode
    );
    progress.report(ReviewStage::Started);

    let mut notices = Vec::new();

    // Stage 1: metrics
    let request = build_request(Goal::Metrics, problem_statement, mode, document);
    let metrics = interpret_metrics(invoker.invoke(&request).await);
    notices.extend(metrics.notice);
    progress.report(ReviewStage::MetricsScored);

    // Stage 2: timeline
    let request = build_request(Goal::Timeline, problem_statement, mode, document);
    let timeline = interpret_timeline(invoker.invoke(&request).await);
    if timeline.value.is_no_timeline() {
        info!("No timeline found in proposal");
    } else {
        info!("Timeline extracted: {} entries", timeline.value.len());
    }
    notices.extend(timeline.notice);
    progress.report(ReviewStage::TimelineExtracted);

    // Stage 3: narrative feedback
    let request = build_request(Goal::Feedback, problem_statement, mode, document);
    let feedback = interpret_feedback(invoker.invoke(&request).await);
    notices.extend(feedback.notice);
    progress.report(ReviewStage::FeedbackWritten);

    let session = ReviewSession::new(metrics.value, timeline.value, feedback.value);
    info!(
        "Review complete: overall_score={}/100, fallbacks={}",
        session.overall_score,
        notices.len()
    );
    progress.report(ReviewStage::Complete);

    ReviewOutcome { session, notices }
}
