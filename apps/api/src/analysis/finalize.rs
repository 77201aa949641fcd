//! Report assembly shared by the free-text and JSON parsers.
//!
//! `ReportDraft` collects items and verdict fields in document order; `finish`
//! applies the post-processing that makes every report well-formed.

use tracing::debug;

use crate::analysis::questions::get_default_questions;
use crate::analysis::verdict::default_reason;
use crate::models::report::{
    ContentItem, Decision, Provenance, StructuredReport, Verdict, MAX_LIST_ITEMS,
    MIN_INTERVIEW_QUESTIONS,
};

/// Gaps about paperwork rather than skills. Matched as lowercase substrings.
pub const ADMINISTRATIVE_GAP_DENYLIST: &[&str] = &[
    "certificate",
    "certification",
    "documentation",
    "missing proof",
];

pub fn is_administrative_gap(text: &str) -> bool {
    let lower = text.to_lowercase();
    ADMINISTRATIVE_GAP_DENYLIST
        .iter()
        .any(|term| lower.contains(term))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Strengths,
    SkillGaps,
    Improvements,
    Questions,
}

#[derive(Debug, Default)]
pub struct ReportDraft {
    strengths: Vec<ContentItem>,
    skill_gaps: Vec<ContentItem>,
    improvement_suggestions: Vec<ContentItem>,
    interview_questions: Vec<ContentItem>,
    decision: Option<Decision>,
    decision_explicit: bool,
    confidence: Option<u8>,
    reason: String,
    reason_explicit: bool,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item. Empty text is ignored and skill gaps pass the denylist first.
    pub fn push(&mut self, list: ListKind, item: ContentItem) {
        if item.text.trim().is_empty() {
            return;
        }
        let target = match list {
            ListKind::Strengths => &mut self.strengths,
            ListKind::SkillGaps => {
                if is_administrative_gap(&item.text) {
                    debug!("Dropping administrative skill gap: {:?}", item.text);
                    return;
                }
                &mut self.skill_gaps
            }
            ListKind::Improvements => &mut self.improvement_suggestions,
            ListKind::Questions => &mut self.interview_questions,
        };
        target.push(item);
    }

    /// An explicit decision always wins; an implied one only fills an unset decision.
    pub fn set_decision(&mut self, decision: Decision, explicit: bool) {
        if explicit {
            if !self.decision_explicit {
                self.decision = Some(decision);
                self.decision_explicit = true;
            }
        } else if self.decision.is_none() {
            self.decision = Some(decision);
        }
    }

    pub fn set_confidence(&mut self, confidence: u8) {
        self.confidence.get_or_insert(confidence);
    }

    /// An explicit reason replaces an implied one and extends an earlier explicit one.
    pub fn set_reason(&mut self, text: &str, explicit: bool) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match (explicit, self.reason_explicit) {
            (true, false) => {
                self.reason = text.to_string();
                self.reason_explicit = true;
            }
            (true, true) => self.append_reason(text),
            (false, _) => {
                if self.reason.is_empty() {
                    self.reason = text.to_string();
                }
            }
        }
    }

    pub fn append_reason(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.reason.is_empty() {
            self.reason.push(' ');
        }
        self.reason.push_str(text);
    }

    /// Applies the safety nets in order: default decision, default reason,
    /// question padding, list truncation.
    pub fn finish(self, role: &str) -> StructuredReport {
        let decision = self.decision.unwrap_or(Decision::NotApplicable);

        let reason = if self.reason.trim().is_empty() {
            default_reason(decision).to_string()
        } else {
            self.reason.trim().to_string()
        };

        let mut interview_questions = self.interview_questions;
        let bank = get_default_questions(role);
        while interview_questions.len() < MIN_INTERVIEW_QUESTIONS {
            let next = bank[interview_questions.len()];
            interview_questions.push(ContentItem::new(next, Some(Provenance::SystemGenerated)));
        }

        StructuredReport {
            strengths: truncate(self.strengths),
            skill_gaps: truncate(self.skill_gaps),
            improvement_suggestions: truncate(self.improvement_suggestions),
            interview_questions: truncate(interview_questions),
            final_verdict: Verdict {
                decision,
                confidence: self.confidence,
                reason,
            },
        }
    }
}

fn truncate(mut items: Vec<ContentItem>) -> Vec<ContentItem> {
    items.truncate(MAX_LIST_ITEMS);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::verdict::{DEFAULT_APPLICABLE_REASON, DEFAULT_NOT_APPLICABLE_REASON};

    fn item(text: &str) -> ContentItem {
        ContentItem::new(text, Some(Provenance::ResumeContent))
    }

    #[test]
    fn test_empty_draft_finishes_with_defaults() {
        let report = ReportDraft::new().finish("Software Engineering Intern");
        assert_eq!(report.final_verdict.decision, Decision::NotApplicable);
        assert_eq!(report.final_verdict.reason, DEFAULT_NOT_APPLICABLE_REASON);
        assert_eq!(report.final_verdict.confidence, None);
        assert_eq!(report.interview_questions.len(), 3);
        assert!(report
            .interview_questions
            .iter()
            .all(|q| q.source == Some(Provenance::SystemGenerated)));
        assert!(report.strengths.is_empty());
    }

    #[test]
    fn test_default_reason_follows_decision() {
        let mut draft = ReportDraft::new();
        draft.set_decision(Decision::Applicable, true);
        let report = draft.finish("AI / ML Intern");
        assert_eq!(report.final_verdict.reason, DEFAULT_APPLICABLE_REASON);
    }

    #[test]
    fn test_padding_continues_from_supplied_count() {
        let mut draft = ReportDraft::new();
        draft.push(ListKind::Questions, item("Own question"));
        let report = draft.finish("Data Science Intern");
        let texts: Vec<&str> = report.interview_questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Own question",
                "Explain the difference between precision and recall.",
                "Describe your approach to exploratory data analysis.",
            ]
        );
    }

    #[test]
    fn test_lists_truncated_to_five_in_order() {
        let mut draft = ReportDraft::new();
        for i in 0..8 {
            draft.push(ListKind::Strengths, item(&format!("strength {i}")));
            draft.push(ListKind::Questions, item(&format!("question {i}")));
        }
        let report = draft.finish("AI / ML Intern");
        assert_eq!(report.strengths.len(), 5);
        assert_eq!(report.strengths[0].text, "strength 0");
        assert_eq!(report.strengths[4].text, "strength 4");
        assert_eq!(report.interview_questions.len(), 5);
    }

    #[test]
    fn test_denylist_filters_skill_gaps_only() {
        let mut draft = ReportDraft::new();
        draft.push(ListKind::SkillGaps, item("Missing certification for AWS"));
        draft.push(ListKind::SkillGaps, item("No documentation of projects"));
        draft.push(ListKind::SkillGaps, item("Missing proof of internship"));
        draft.push(ListKind::SkillGaps, item("No Cloud experience"));
        draft.push(ListKind::Strengths, item("AWS certificate holder"));
        let report = draft.finish("AI / ML Intern");
        assert_eq!(report.skill_gaps.len(), 1);
        assert_eq!(report.skill_gaps[0].text, "No Cloud experience");
        assert_eq!(report.strengths.len(), 1);
    }

    #[test]
    fn test_explicit_decision_overrides_implied() {
        let mut draft = ReportDraft::new();
        draft.set_decision(Decision::NotApplicable, false);
        draft.set_decision(Decision::Applicable, true);
        draft.set_decision(Decision::NotApplicable, false);
        assert_eq!(draft.finish("x").final_verdict.decision, Decision::Applicable);
    }

    #[test]
    fn test_explicit_reason_replaces_implied_and_extends_explicit() {
        let mut draft = ReportDraft::new();
        draft.set_reason("implied words", false);
        draft.set_reason("First part.", true);
        draft.set_reason("Second part.", true);
        draft.set_reason("ignored implied", false);
        assert_eq!(draft.finish("x").final_verdict.reason, "First part. Second part.");
    }

    #[test]
    fn test_first_confidence_kept() {
        let mut draft = ReportDraft::new();
        draft.set_confidence(60);
        draft.set_confidence(90);
        assert_eq!(draft.finish("x").final_verdict.confidence, Some(60));
    }

    #[test]
    fn test_blank_items_ignored() {
        let mut draft = ReportDraft::new();
        draft.push(ListKind::Strengths, item("   "));
        assert!(draft.finish("x").strengths.is_empty());
    }
}
