//! Request Builder: turns a goal, a problem statement and a document into a `ModelRequest`.
//!
//! Pure construction: identical inputs always produce identical prompts, and nothing
//! here touches the network.

use std::fmt;

use serde::Serialize;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::models::document::DocumentPayload;
use crate::models::review::ReviewMode;
use crate::review::prompts::{
    FEEDBACK_MENTOR_PROMPT_TEMPLATE, FEEDBACK_STUDENT_PROMPT_TEMPLATE, FEEDBACK_SYSTEM,
    METRICS_PROMPT_TEMPLATE, METRICS_SYSTEM, TIMELINE_PROMPT, TIMELINE_SYSTEM,
};

/// One of the three extraction tasks run per submission, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Metrics,
    Timeline,
    Feedback,
}

impl Goal {
    #[cfg(test)]
    pub const ALL: [Goal; 3] = [Goal::Metrics, Goal::Timeline, Goal::Feedback];

    /// Timeline extraction must not invent anything, so it runs colder.
    pub fn temperature(self) -> f32 {
        match self {
            Goal::Metrics | Goal::Feedback => 0.2,
            Goal::Timeline => 0.1,
        }
    }

    pub fn expects_json(self) -> bool {
        !matches!(self, Goal::Feedback)
    }

    fn system_prompt(self) -> &'static str {
        match self {
            Goal::Metrics => METRICS_SYSTEM,
            Goal::Timeline => TIMELINE_SYSTEM,
            Goal::Feedback => FEEDBACK_SYSTEM,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Goal::Metrics => "metrics",
            Goal::Timeline => "timeline",
            Goal::Feedback => "feedback",
        };
        f.write_str(name)
    }
}

/// Everything one model call needs. Borrows the document; owns the prompt text.
#[derive(Debug)]
pub struct ModelRequest<'a> {
    pub goal: Goal,
    pub system: String,
    pub prompt: String,
    pub document: &'a DocumentPayload,
    pub temperature: f32,
}

pub fn build_request<'a>(
    goal: Goal,
    problem_statement: &str,
    mode: ReviewMode,
    document: &'a DocumentPayload,
) -> ModelRequest<'a> {
    let mut prompt = match (goal, mode) {
        (Goal::Metrics, _) => METRICS_PROMPT_TEMPLATE.replace("{problem_statement}", problem_statement),
        (Goal::Timeline, _) => TIMELINE_PROMPT.to_string(),
        (Goal::Feedback, ReviewMode::Mentor) => {
            FEEDBACK_MENTOR_PROMPT_TEMPLATE.replace("{problem_statement}", problem_statement)
        }
        (Goal::Feedback, ReviewMode::Student) => {
            FEEDBACK_STUDENT_PROMPT_TEMPLATE.replace("{problem_statement}", problem_statement)
        }
    };

    if goal.expects_json() {
        prompt.push_str("\n\n");
        prompt.push_str(JSON_ONLY_INSTRUCTION);
    }

    ModelRequest {
        goal,
        system: format!("{}\n\n{}", goal.system_prompt(), GROUNDING_INSTRUCTION),
        prompt,
        document,
        temperature: goal.temperature(),
    }
}
