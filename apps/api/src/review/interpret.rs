//! Response Interpreter: turns raw model text into validated results.
//!
//! Contract: every function here returns a usable value. Parse failures and
//! invocation failures both collapse to the goal's full default and produce one
//! `StageNotice`; missing metrics keys are defaulted one by one without a notice.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::llm_client::LlmError;
use crate::models::review::{
    default_strengths, default_weaknesses, MetricsResult, TimelineResult, DEFAULT_SCORE,
    MAX_SCORE, MIN_SCORE,
};
use crate::review::request::Goal;

pub const TIMELINE_PARSE_FAILED: &str = "Failed to parse timeline data from the proposal.";
pub const TIMELINE_EXTRACT_FAILED: &str = "Failed to extract timeline from the proposal.";
pub const FEEDBACK_FAILED: &str =
    "Failed to generate review. Please check your API key and try again.";

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A stage that fell back to its default, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageNotice {
    pub goal: Goal,
    pub message: String,
}

/// A stage result plus the notice explaining a fallback, if one happened.
#[derive(Debug)]
pub struct Interpreted<T> {
    pub value: T,
    pub notice: Option<StageNotice>,
}

impl<T> Interpreted<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            notice: None,
        }
    }

    fn fallback(goal: Goal, value: T, message: String) -> Self {
        error!("{goal} stage fell back to default: {message}");
        Self {
            value,
            notice: Some(StageNotice { goal, message }),
        }
    }
}

/// Strips markdown fencing around a structured reply.
///
/// A ```` ```json ```` block wins over any other fence; otherwise the first fenced
/// block is used; text without fences is returned unmodified. An unterminated
/// fence yields everything after the opener.
pub fn unwrap_fencing(text: &str) -> &str {
    if let Some((_, rest)) = text.split_once("```json") {
        return fence_interior(rest).trim();
    }
    if let Some((_, rest)) = text.split_once("```") {
        return skip_info_string(fence_interior(rest)).trim();
    }
    text
}

fn fence_interior(after_opener: &str) -> &str {
    after_opener
        .split_once("```")
        .map(|(interior, _)| interior)
        .unwrap_or(after_opener)
}

/// Drops a language tag such as `JSON` or `javascript` on the opening fence line.
fn skip_info_string(interior: &str) -> &str {
    match interior.split_once('\n') {
        Some((first, rest))
            if !first.trim().is_empty()
                && !first.contains(['{', '[', '"'])
                && !first.trim().contains(char::is_whitespace) =>
        {
            rest
        }
        _ => interior,
    }
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, InterpretError> {
    match serde_json::from_str::<Value>(unwrap_fencing(raw))? {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(InterpretError::NotAnObject("an array")),
        Value::String(_) => Err(InterpretError::NotAnObject("a string")),
        Value::Number(_) => Err(InterpretError::NotAnObject("a number")),
        Value::Bool(_) => Err(InterpretError::NotAnObject("a boolean")),
        Value::Null => Err(InterpretError::NotAnObject("null")),
    }
}

/// Parses a metrics reply, defaulting each missing or ill-typed key on its own.
pub fn parse_metrics(raw: &str) -> Result<MetricsResult, InterpretError> {
    let obj = parse_object(raw)?;

    Ok(MetricsResult {
        technical_depth: score_field(&obj, "technical_depth"),
        project_understanding: score_field(&obj, "project_understanding"),
        timeline_clarity: score_field(&obj, "timeline_clarity"),
        innovation_score: score_field(&obj, "innovation_score"),
        implementation_feasibility: score_field(&obj, "implementation_feasibility"),
        strengths: list_field(&obj, "strengths").unwrap_or_else(default_strengths),
        weaknesses: list_field(&obj, "weaknesses").unwrap_or_else(default_weaknesses),
    })
}

/// Parses a timeline reply. The mapping is kept exactly as the model sent it.
pub fn parse_timeline(raw: &str) -> Result<TimelineResult, InterpretError> {
    parse_object(raw).map(TimelineResult::new)
}

fn score_field(obj: &Map<String, Value>, key: &str) -> u32 {
    match obj.get(key).and_then(|v| score_from_value(key, v)) {
        Some(score) => score,
        None => {
            debug!("metrics key '{key}' missing or not numeric, using default {DEFAULT_SCORE}");
            DEFAULT_SCORE
        }
    }
}

/// Numbers and numeric strings are accepted; fractions are rounded and
/// anything outside 1–100 is clamped.
fn score_from_value(key: &str, value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }

    let rounded = raw.round();
    let clamped = rounded.clamp(MIN_SCORE as f64, MAX_SCORE as f64);
    if clamped != rounded {
        warn!("metrics key '{key}' out of range ({raw}), clamped to {clamped}");
    }
    Some(clamped as u32)
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = obj.get(key)?.as_array()?;
    if items.is_empty() {
        debug!("metrics key '{key}' is an empty list, using defaults");
        return None;
    }
    let strings: Option<Vec<String>> = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect();
    if strings.is_none() {
        debug!("metrics key '{key}' contains non-string items, using defaults");
    }
    strings
}

pub fn interpret_metrics(outcome: Result<String, LlmError>) -> Interpreted<MetricsResult> {
    match outcome {
        Ok(raw) => match parse_metrics(&raw) {
            Ok(metrics) => Interpreted::ok(metrics),
            Err(e) => Interpreted::fallback(
                Goal::Metrics,
                MetricsResult::default(),
                format!("Error parsing metrics JSON: {e}"),
            ),
        },
        Err(e) => Interpreted::fallback(
            Goal::Metrics,
            MetricsResult::default(),
            format!("Error analyzing proposal: {e}"),
        ),
    }
}

pub fn interpret_timeline(outcome: Result<String, LlmError>) -> Interpreted<TimelineResult> {
    match outcome {
        Ok(raw) => match parse_timeline(&raw) {
            Ok(timeline) => Interpreted::ok(timeline),
            Err(e) => Interpreted::fallback(
                Goal::Timeline,
                TimelineResult::no_timeline(TIMELINE_PARSE_FAILED),
                format!("Error parsing timeline JSON: {e}"),
            ),
        },
        Err(e) => Interpreted::fallback(
            Goal::Timeline,
            TimelineResult::no_timeline(TIMELINE_EXTRACT_FAILED),
            format!("Error extracting timeline: {e}"),
        ),
    }
}

/// Feedback is free text: no parsing, only the invocation can fail.
pub fn interpret_feedback(outcome: Result<String, LlmError>) -> Interpreted<String> {
    match outcome {
        Ok(raw) => Interpreted::ok(raw),
        Err(e) => Interpreted::fallback(
            Goal::Feedback,
            FEEDBACK_FAILED.to_string(),
            format!("Error generating AI review: {e}"),
        ),
    }
}
