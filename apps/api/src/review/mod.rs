// Review pipeline: intake, request building, model invocation, interpretation,
// session aggregation and export.
// All LLM calls go through llm_client, no direct Anthropic calls here.

pub mod export;
pub mod guidelines;
pub mod handlers;
pub mod intake;
pub mod interpret;
pub mod orchestrator;
pub mod prompts;
pub mod request;
pub mod session_store;
