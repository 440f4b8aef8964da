//! Scripted `ModelInvoker` for pipeline and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, ModelInvoker};
use crate::review::request::{Goal, ModelRequest};

/// Returns a canned reply per goal; goals without a reply fail with a 503.
#[derive(Default)]
pub struct ScriptedInvoker {
    replies: HashMap<Goal, String>,
    calls: Mutex<Vec<(Goal, String)>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, goal: Goal, text: &str) -> Self {
        self.replies.insert(goal, text.to_string());
        self
    }

    /// Goals and user prompts in call order.
    pub fn calls(&self) -> Vec<(Goal, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, request: &ModelRequest<'_>) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.goal, request.prompt.clone()));
        self.replies
            .get(&request.goal)
            .cloned()
            .ok_or_else(|| LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
    }
}
