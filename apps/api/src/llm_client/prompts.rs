// Shared prompt fragments used across the analysis prompts.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Evidence rules shared by every evaluation prompt.
pub const EVIDENCE_INSTRUCTION: &str = "\
    - DO NOT assume or infer skills not explicitly mentioned.\n\
    - DO NOT guess experience levels.\n\
    - DO NOT add technologies, tools, or concepts not present in the resume.\n\
    - DO NOT use vague language such as \"may\", \"appears\", \"likely\".\n\
    - Every point MUST be directly supported by resume content or role expectations.\n\
    - If information is missing, state it clearly as missing.";

/// Appended to the evaluator prompt on the second and final attempt.
pub const RETRY_INSTRUCTION: &str = "\
    IMPORTANT: Your previous answer could not be processed. \
    Follow the output format EXACTLY as specified. Do not add any other text.";
