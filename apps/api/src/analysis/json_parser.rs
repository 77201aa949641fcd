//! JSON-mode parser: strict decode of the evaluator's JSON contract, with one
//! repair pass for near-valid output (surrounding prose, trailing commas, smart quotes).

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::analysis::finalize::{ListKind, ReportDraft};
use crate::analysis::normalize::normalize_line;
use crate::analysis::provenance::infer_source;
use crate::analysis::verdict::{parse_confidence, parse_decision};
use crate::llm_client::strip_json_fences;
use crate::models::report::{ContentItem, Provenance, StructuredReport};

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("no JSON object found in evaluator output")]
    NoObject,

    #[error("evaluator JSON is invalid after repair: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A list entry: either a bare string or an object carrying `text`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordItem {
    Text(String),
    Object { text: String },
}

impl RecordItem {
    fn text(&self) -> &str {
        match self {
            RecordItem::Text(text) | RecordItem::Object { text } => text,
        }
    }
}

/// `final_verdict` as a decision label or as the report's own verdict block.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordVerdict {
    Label(String),
    Block {
        decision: String,
        #[serde(default)]
        confidence: Option<serde_json::Value>,
        #[serde(default)]
        reason: Option<String>,
    },
}

/// The evaluator's JSON contract.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorRecord {
    #[serde(default)]
    pub strengths: Vec<RecordItem>,
    #[serde(default)]
    pub skill_gaps: Vec<RecordItem>,
    #[serde(default)]
    pub improvement_suggestions: Vec<RecordItem>,
    #[serde(default)]
    pub interview_questions: Vec<RecordItem>,
    pub final_verdict: RecordVerdict,
    #[serde(default)]
    pub verdict_reason: Option<String>,
    #[serde(default)]
    pub confidence: Option<serde_json::Value>,
}

/// Decodes evaluator output. Strict first, then once more after repair.
pub fn parse(text: &str) -> Result<EvaluatorRecord, ParseFailure> {
    let text = strip_json_fences(text);
    match serde_json::from_str::<EvaluatorRecord>(text) {
        Ok(record) => return Ok(record),
        Err(e) => debug!("Strict JSON decode failed, attempting repair: {e}"),
    }

    let span = extract_object(text).ok_or(ParseFailure::NoObject)?;
    let repaired = remove_trailing_commas(&normalize_quotes(span));
    Ok(serde_json::from_str::<EvaluatorRecord>(&repaired)?)
}

/// First balanced `{...}` span. Falls back to first `{` .. last `}` when the
/// braces never balance.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect()
}

/// Drops commas that directly precede `}` or `]`, ignoring string contents.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

impl EvaluatorRecord {
    /// Converts the record into a report through the same safety nets as free text.
    pub fn into_report(self, role: &str) -> StructuredReport {
        let mut draft = ReportDraft::new();

        push_all(&mut draft, ListKind::Strengths, &self.strengths, |t| Some(infer_source(t)));
        push_all(&mut draft, ListKind::SkillGaps, &self.skill_gaps, |t| Some(infer_source(t)));
        push_all(&mut draft, ListKind::Improvements, &self.improvement_suggestions, |_| None);
        push_all(&mut draft, ListKind::Questions, &self.interview_questions, |_| {
            Some(Provenance::Evaluator)
        });

        let (label, block_confidence, block_reason) = match &self.final_verdict {
            RecordVerdict::Label(label) => (label.as_str(), None, None),
            RecordVerdict::Block {
                decision,
                confidence,
                reason,
            } => (decision.as_str(), confidence.as_ref(), reason.as_deref()),
        };

        if let Some(decision) = parse_decision(label) {
            draft.set_decision(decision, true);
        }
        if let Some(confidence) = block_confidence
            .or(self.confidence.as_ref())
            .and_then(confidence_value)
        {
            draft.set_confidence(confidence);
        }
        if let Some(reason) = block_reason.or(self.verdict_reason.as_deref()) {
            draft.set_reason(reason, true);
        }

        draft.finish(role)
    }
}

fn push_all(
    draft: &mut ReportDraft,
    list: ListKind,
    items: &[RecordItem],
    source: impl Fn(&str) -> Option<Provenance>,
) {
    for item in items {
        let text = normalize_line(item.text());
        if text.is_empty() {
            continue;
        }
        let tag = source(&text);
        draft.push(list, ContentItem::new(text, tag));
    }
}

/// Accepts `82`, `82.4` or `"82%"`.
fn confidence_value(value: &serde_json::Value) -> Option<u8> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|v| (0.0..=100.0).contains(v))
            .map(|v| v.round() as u8),
        serde_json::Value::String(s) => parse_confidence(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::Decision;

    const ROLE: &str = "AI / ML Intern";

    #[test]
    fn test_strict_decode() {
        let text = r#"{"strengths": ["Python"], "final_verdict": "Not Applicable", "verdict_reason": "No ML"}"#;
        let record = parse(text).unwrap();
        let report = record.into_report(ROLE);
        assert_eq!(report.strengths[0].text, "Python");
        assert_eq!(report.final_verdict.decision, Decision::NotApplicable);
        assert_eq!(report.final_verdict.reason, "No ML");
    }

    #[test]
    fn test_trailing_comma_after_object_is_repaired() {
        let text = r#"{"strengths": ["A"], "skill_gaps": [], "improvement_suggestions": [], "interview_questions": ["Q1"], "final_verdict": "Applicable", "verdict_reason": "ok"},"#;
        let report = parse(text).unwrap().into_report(ROLE);
        assert_eq!(report.final_verdict.decision, Decision::Applicable);
        assert_eq!(report.final_verdict.reason, "ok");
        assert_eq!(report.strengths[0].text, "A");
        assert_eq!(report.interview_questions[0].text, "Q1");
        assert_eq!(report.interview_questions.len(), 3);
    }

    #[test]
    fn test_trailing_commas_inside_arrays_and_objects() {
        let text = "{\"strengths\": [\"A\", \"B\",], \"final_verdict\": \"Applicable\",\n}";
        let report = parse(text).unwrap().into_report(ROLE);
        assert_eq!(report.strengths.len(), 2);
    }

    #[test]
    fn test_commas_inside_strings_survive_repair() {
        let text = "Sure! {\"strengths\": [\"fast, }\"], \"final_verdict\": \"Applicable\",}";
        let report = parse(text).unwrap().into_report(ROLE);
        assert_eq!(report.strengths[0].text, "fast, }");
    }

    #[test]
    fn test_smart_quotes_are_normalized() {
        let text = "{\u{201C}strengths\u{201D}: [\u{201C}Rust\u{201D}], \u{201C}final_verdict\u{201D}: \u{201C}Applicable\u{201D}}";
        let report = parse(text).unwrap().into_report(ROLE);
        assert_eq!(report.strengths[0].text, "Rust");
    }

    #[test]
    fn test_prose_around_object_and_code_fences() {
        let text = "Here is the evaluation:\n```json\n{\"final_verdict\": \"Applicable\"}\n```\nThanks.";
        assert!(parse(text).is_ok());
        let fenced = "```json\n{\"final_verdict\": \"Not Applicable\"}\n```";
        assert_eq!(
            parse(fenced).unwrap().into_report(ROLE).final_verdict.decision,
            Decision::NotApplicable
        );
    }

    #[test]
    fn test_garbage_is_parse_failure() {
        assert!(matches!(parse("no json here"), Err(ParseFailure::NoObject)));
        assert!(matches!(parse(""), Err(ParseFailure::NoObject)));
        assert!(matches!(parse("{not: valid json}"), Err(ParseFailure::Invalid(_))));
    }

    #[test]
    fn test_missing_final_verdict_is_parse_failure() {
        assert!(matches!(
            parse(r#"{"strengths": ["A"]}"#),
            Err(ParseFailure::Invalid(_))
        ));
    }

    #[test]
    fn test_verdict_block_and_object_items() {
        let text = r#"{
            "strengths": [{"text": "- Strong SQL", "source": "Skills section"}],
            "skill_gaps": ["Missing certification", "No Spark"],
            "final_verdict": {"decision": "Applicable", "confidence": 77, "reason": "Good fit"}
        }"#;
        let report = parse(text).unwrap().into_report(ROLE);
        assert_eq!(report.strengths[0].text, "Strong SQL");
        assert_eq!(report.strengths[0].source, Some(Provenance::Skills));
        assert_eq!(report.skill_gaps.len(), 1);
        assert_eq!(report.final_verdict.confidence, Some(77));
        assert_eq!(report.final_verdict.reason, "Good fit");
    }

    #[test]
    fn test_unrecognized_decision_defaults_to_not_applicable() {
        let report = parse(r#"{"final_verdict": "Maybe"}"#)
            .unwrap()
            .into_report(ROLE);
        assert_eq!(report.final_verdict.decision, Decision::NotApplicable);
        assert!(!report.final_verdict.reason.is_empty());
    }

    #[test]
    fn test_report_json_round_trips_through_parser() {
        let text = r#"{"strengths": ["Python"], "final_verdict": "Applicable", "confidence": "90%"}"#;
        let original = parse(text).unwrap().into_report(ROLE);
        let json = serde_json::to_string(&original).unwrap();
        let reparsed = parse(&json).unwrap().into_report(ROLE);
        assert_eq!(reparsed.final_verdict, original.final_verdict);
        assert_eq!(reparsed.strengths[0].text, "Python");
    }

    #[test]
    fn test_unbalanced_braces_fall_back_to_last_brace() {
        assert_eq!(extract_object("x { \"a\": { } y"), Some("{ \"a\": { }"));
        assert_eq!(extract_object("{ } }"), Some("{ }"));
        assert_eq!(extract_object("}{"), None);
    }
}
