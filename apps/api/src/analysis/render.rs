use std::fmt::Write;

use crate::models::report::{ContentItem, StructuredReport};

const EMPTY_LIST_LINE: &str = "- None identified";

/// Renders a report as the plain-text document returned by `/api/v1/reports/text`.
/// Works from the report alone; nothing is re-parsed.
pub fn render_text(report: &StructuredReport) -> String {
    let mut out = String::new();

    render_list(&mut out, "Strengths", &report.strengths);
    render_list(&mut out, "Skill Gaps", &report.skill_gaps);
    render_list(
        &mut out,
        "Improvement Suggestions",
        &report.improvement_suggestions,
    );
    render_list(&mut out, "Interview Questions", &report.interview_questions);

    let verdict = &report.final_verdict;
    let _ = writeln!(out, "Final Verdict: {}", verdict.decision.label());
    if let Some(confidence) = verdict.confidence {
        let _ = writeln!(out, "Confidence: {confidence}%");
    }
    let _ = writeln!(out, "Reason: {}", verdict.reason);

    out
}

fn render_list(out: &mut String, header: &str, items: &[ContentItem]) {
    let _ = writeln!(out, "{header}:");
    if items.is_empty() {
        out.push_str(EMPTY_LIST_LINE);
        out.push('\n');
    }
    for item in items {
        match item.source {
            Some(source) => {
                let _ = writeln!(out, "- {} (Source: {})", item.text, source.label());
            }
            None => {
                let _ = writeln!(out, "- {}", item.text);
            }
        }
    }
    out.push('\n');
}
