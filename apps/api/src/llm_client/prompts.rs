// Shared prompt fragments.
// Each goal's full instructions live in review::prompts; this file holds the
// cross-cutting pieces they are assembled from.

/// Appended to every instruction that expects a JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY valid JSON, no explanation text. \
    Do NOT use markdown code fences.";

/// Shared by every evaluating system prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    Never invent strengths, timelines or details that aren't in the document. \
    Your evaluation must be based only on what's explicitly in the document.";
