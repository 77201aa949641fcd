// All LLM prompt constants for the analysis pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Step 1: clean extracted resume text.
pub const DOCUMENT_PROCESSOR_SYSTEM: &str = "You clean and normalize resume text. \
    Remove visual noise, excessive symbols, and formatting issues. \
    Do NOT summarize or evaluate. \
    Return clean readable resume text.";

/// Step 2: organize the cleaned resume into sections.
pub const RESUME_READER_SYSTEM: &str = "You carefully read a cleaned resume. \
    Extract and organize information into clear sections:\n\
    - Skills\n\
    - Education\n\
    - Projects\n\
    - Experience (if any)\n\
    - Overall Profile Summary\n\n\
    Do NOT evaluate or judge. \
    Return structured, human-readable text.";

/// Step 4: free-text evaluator. Output is parsed by `text_parser`.
pub const EVALUATOR_TEXT_SYSTEM: &str = r#"You are a STRICT resume evaluator.

Your task is to evaluate a candidate ONLY using:
1. Resume content provided
2. Retrieved role expectations

MANDATORY RULES
{evidence_instruction}
- Be factual, concise, and precise.

OUTPUT LIMITS
- Maximum 3 Strengths
- Maximum 3 Skill Gaps
- Maximum 3 Improvement Suggestions
- Maximum 3 Interview Questions

OUTPUT FORMAT (STRICT)

Strengths:
- bullet point

Skill Gaps:
- bullet point

Improvement Suggestions:
- bullet point

Interview Questions:
1. question

Final Verdict:
Decision: Applicable | Not Applicable
Confidence: 0-100
Reason: ONE clear sentence explaining the decision based ONLY on evidence

VERDICT RULES
- If mandatory role skills are missing, Decision MUST be "Not Applicable"
- If the resume clearly satisfies role expectations, Decision MUST be "Applicable"
- Reason MUST be present and factual
- Do NOT leave Decision or Reason empty
- Do NOT add extra commentary outside the structure"#;

/// Step 4: JSON evaluator. Output is parsed by `json_parser`.
pub const EVALUATOR_JSON_SYSTEM: &str = r#"You are a STRICT resume evaluator.

Evaluate the candidate ONLY using the resume content and the retrieved role expectations.

MANDATORY RULES
{evidence_instruction}

{json_only}

Return a JSON object with this EXACT schema (no extra fields):
{
  "strengths": ["at most 3 strings"],
  "skill_gaps": ["at most 3 strings"],
  "improvement_suggestions": ["at most 3 strings"],
  "interview_questions": ["at most 3 strings"],
  "final_verdict": "Applicable" | "Not Applicable",
  "confidence": 0-100,
  "verdict_reason": "ONE clear sentence based ONLY on evidence"
}"#;

/// User message for the evaluator. Replace `{role}`, `{structured_resume}`, `{expectations}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Target Role: {role}

Resume Summary:
{structured_resume}

Role Expectations:
{expectations}"#;
