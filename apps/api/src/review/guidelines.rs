//! Static proposal-writing guidance served alongside reviews.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct KeyComponent {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Guidelines {
    pub tips: Vec<&'static str>,
    pub key_components: Vec<KeyComponent>,
    pub common_pitfalls: Vec<&'static str>,
}

const TIPS: &[&str] = &[
    "Clearly define the problem",
    "Provide a detailed implementation plan",
    "Include a realistic timeline",
    "Demonstrate your technical capabilities",
    "Explain your motivation for the project",
];

const KEY_COMPONENTS: &[(&str, &str)] = &[
    (
        "Project Understanding",
        "Demonstrate that you understand the project and its goals.",
    ),
    (
        "Implementation Plan",
        "Provide a detailed plan for how you will implement the project.",
    ),
    (
        "Timeline",
        "Include a realistic timeline with milestones and deliverables.",
    ),
    (
        "Technical Skills",
        "Highlight your relevant technical skills and experience.",
    ),
    (
        "Motivation",
        "Explain why you're interested in this project and organization.",
    ),
    (
        "Communication",
        "Show that you can communicate clearly and effectively.",
    ),
];

const PITFALLS: &[&str] = &[
    "Vague or generic proposals",
    "Unrealistic timelines",
    "Lack of technical details",
    "Poor organization or formatting",
    "Not addressing project requirements",
];

pub fn guidelines() -> Guidelines {
    Guidelines {
        tips: TIPS.to_vec(),
        key_components: KEY_COMPONENTS
            .iter()
            .map(|&(name, description)| KeyComponent { name, description })
            .collect(),
        common_pitfalls: PITFALLS.to_vec(),
    }
}
