use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SCORE: u32 = 20;
pub const MIN_SCORE: u32 = 1;
pub const MAX_SCORE: u32 = 100;

pub const DEFAULT_STRENGTH: &str = "No clear strength identified";
pub const DEFAULT_WEAKNESSES: [&str; 3] = [
    "Proposal lacks essential details",
    "Insufficient addressing of problem statement",
    "Missing clear implementation plan",
];

pub const NO_TIMELINE_KEY: &str = "No Timeline";
pub const NO_TIMELINE_MESSAGE: &str =
    "The proposal does not contain a clear timeline or schedule.";

/// Who the narrative feedback is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    #[default]
    Student,
    Mentor,
}

impl ReviewMode {
    pub fn from_flag(reviewer: bool) -> Self {
        if reviewer {
            ReviewMode::Mentor
        } else {
            ReviewMode::Student
        }
    }
}

/// Five 1–100 scores plus three strengths and three weaknesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub technical_depth: u32,
    pub project_understanding: u32,
    pub timeline_clarity: u32,
    pub innovation_score: u32,
    pub implementation_feasibility: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl Default for MetricsResult {
    fn default() -> Self {
        Self {
            technical_depth: DEFAULT_SCORE,
            project_understanding: DEFAULT_SCORE,
            timeline_clarity: DEFAULT_SCORE,
            innovation_score: DEFAULT_SCORE,
            implementation_feasibility: DEFAULT_SCORE,
            strengths: default_strengths(),
            weaknesses: default_weaknesses(),
        }
    }
}

pub fn default_strengths() -> Vec<String> {
    vec![DEFAULT_STRENGTH.to_string(); 3]
}

pub fn default_weaknesses() -> Vec<String> {
    DEFAULT_WEAKNESSES.iter().map(|w| w.to_string()).collect()
}

impl MetricsResult {
    /// Floor of the mean of all five scores, innovation included.
    pub fn overall_score(&self) -> u32 {
        (self.technical_depth
            + self.project_understanding
            + self.timeline_clarity
            + self.innovation_score
            + self.implementation_feasibility)
            / 5
    }

    /// (label, score) pairs in display order.
    pub fn labelled_scores(&self) -> [(&'static str, u32); 5] {
        [
            ("Technical Depth", self.technical_depth),
            ("Project Understanding", self.project_understanding),
            ("Timeline Clarity", self.timeline_clarity),
            ("Innovation Score", self.innovation_score),
            (
                "Implementation Feasibility",
                self.implementation_feasibility,
            ),
        ]
    }
}

/// Period label → task description, in the order the model listed them.
///
/// Held verbatim: a partially-shaped timeline is not repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineResult(Map<String, Value>);

impl TimelineResult {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// The single-entry "No Timeline" mapping with the given explanation.
    pub fn no_timeline(message: &str) -> Self {
        let mut map = Map::new();
        map.insert(
            NO_TIMELINE_KEY.to_string(),
            Value::String(message.to_string()),
        );
        Self(map)
    }

    pub fn is_no_timeline(&self) -> bool {
        self.0.len() == 1 && self.0.contains_key(NO_TIMELINE_KEY)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries rendered as text. Non-string task values (lists, numbers) are
    /// flattened for display only; the stored mapping is untouched.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.0
            .iter()
            .map(|(period, task)| (period.as_str(), task_text(task)))
    }
}

impl Default for TimelineResult {
    fn default() -> Self {
        Self::no_timeline(NO_TIMELINE_MESSAGE)
    }
}

fn task_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| task_text(item).into_owned())
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Presentation bucket for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 70 => ScoreBand::High,
            s if s >= 50 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

/// The complete result of one submission. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSession {
    pub metrics: MetricsResult,
    pub timeline: TimelineResult,
    pub feedback: String,
    pub overall_score: u32,
}

impl ReviewSession {
    pub fn new(metrics: MetricsResult, timeline: TimelineResult, feedback: String) -> Self {
        let overall_score = metrics.overall_score();
        Self {
            metrics,
            timeline,
            feedback,
            overall_score,
        }
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }
}
