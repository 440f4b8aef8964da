//! Export: renders a `ReviewSession` as a JSON document or a plain-text report.
//!
//! The JSON form is the canonical lossless serialization; the text report is for
//! humans and drops nothing but structure.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::review::{MetricsResult, ReviewSession, TimelineResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const NO_ENTRIES: &str = "(no entries)";

/// Exactly the five exported keys, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewExport {
    pub timestamp: String,
    pub overall_score: u32,
    pub metrics: MetricsResult,
    pub timeline: TimelineResult,
    pub feedback: String,
}

impl ReviewExport {
    pub fn new(session: &ReviewSession, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            overall_score: session.overall_score,
            metrics: session.metrics.clone(),
            timeline: session.timeline.clone(),
            feedback: session.feedback.clone(),
        }
    }
}

/// Download name for an export generated at `at`, e.g. `proposal_review_20260301_101500.json`.
pub fn export_file_name(at: DateTime<Utc>, extension: &str) -> String {
    format!("proposal_review_{}.{extension}", at.format(FILE_STAMP_FORMAT))
}

pub fn to_json(session: &ReviewSession, at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReviewExport::new(session, at))
}

pub fn to_text_report(session: &ReviewSession, at: DateTime<Utc>) -> String {
    TextReport { session, at }.to_string()
}

/// Human-readable rendering of one session, generated at `at`.
pub struct TextReport<'a> {
    pub session: &'a ReviewSession,
    pub at: DateTime<Utc>,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let metrics = &session.metrics;

        writeln!(f, "GSoC PROPOSAL REVIEW - {}", self.at.format(FILE_STAMP_FORMAT))?;
        writeln!(f)?;
        writeln!(f, "OVERALL SCORE: {}/100", session.overall_score)?;
        writeln!(f)?;

        writeln!(f, "KEY METRICS:")?;
        for (label, score) in metrics.labelled_scores() {
            writeln!(f, "{label}: {score}/100")?;
        }
        writeln!(f)?;

        writeln!(f, "STRENGTHS:")?;
        for strength in &metrics.strengths {
            writeln!(f, "- {strength}")?;
        }
        writeln!(f)?;

        writeln!(f, "AREAS FOR IMPROVEMENT:")?;
        for weakness in &metrics.weaknesses {
            writeln!(f, "- {weakness}")?;
        }
        writeln!(f)?;

        writeln!(f, "PROJECT TIMELINE:")?;
        if session.timeline.is_empty() {
            writeln!(f, "- {NO_ENTRIES}")?;
        }
        for (period, task) in session.timeline.entries() {
            writeln!(f, "- {period}: {task}")?;
        }
        writeln!(f)?;

        writeln!(f, "DETAILED FEEDBACK:")?;
        writeln!(f, "{}", session.feedback)
    }
}
