//! Free-text report parser: a line-driven state machine over evaluator output.
//!
//! `step` is the pure transition `(state, line) -> (state, emission)`;
//! `parse_report` folds it over the input into a `ReportDraft` and finishes it.
//! The parser never fails: worst case is empty lists, a Not Applicable decision and
//! a default reason.

use crate::analysis::finalize::{ListKind, ReportDraft};
use crate::analysis::provenance::infer_source;
use crate::analysis::sections::{classify, LineKind, Section, VerdictField};
use crate::analysis::verdict::{is_bare_decision, parse_confidence, parse_decision};
use crate::models::report::{ContentItem, Decision, Provenance, StructuredReport};

/// Sub-mode of the verdict block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictMode {
    /// Just entered the verdict; the first unlabelled sentence is the reason.
    CollectingReason,
    /// A field was labelled or the reason captured; unlabelled lines only hint a decision.
    Settled,
    /// After `Reason:`; unlabelled lines continue the reason.
    ContinuingReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    None,
    Strengths,
    SkillGaps,
    Improvements,
    Questions,
    Verdict(VerdictMode),
}

impl ParserState {
    fn enter(section: Section) -> Self {
        match section {
            Section::None => ParserState::None,
            Section::Strengths => ParserState::Strengths,
            Section::SkillGaps => ParserState::SkillGaps,
            Section::Improvements => ParserState::Improvements,
            Section::Questions => ParserState::Questions,
            Section::Verdict => ParserState::Verdict(VerdictMode::CollectingReason),
        }
    }

    pub fn section(self) -> Section {
        match self {
            ParserState::None => Section::None,
            ParserState::Strengths => Section::Strengths,
            ParserState::SkillGaps => Section::SkillGaps,
            ParserState::Improvements => Section::Improvements,
            ParserState::Questions => Section::Questions,
            ParserState::Verdict(_) => Section::Verdict,
        }
    }
}

/// What a single line contributes to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Item { list: ListKind, item: ContentItem },
    Decision { decision: Decision, explicit: bool },
    Confidence(u8),
    Reason { text: String, explicit: bool, decision_hint: Option<Decision> },
    ReasonContinuation(String),
}

/// Pure transition over one raw line.
pub fn step(state: ParserState, line: &str) -> (ParserState, Option<Emission>) {
    match classify(line, state.section()) {
        LineKind::Blank => (state, None),
        LineKind::Header { section, inline } => {
            let entered = ParserState::enter(section);
            match inline {
                Some(text) => step(entered, &text),
                None => (entered, None),
            }
        }
        LineKind::Field { field, value } => verdict_field(field, &value),
        LineKind::Content(text) => content(state, text),
    }
}

fn verdict_field(field: VerdictField, value: &str) -> (ParserState, Option<Emission>) {
    let settled = ParserState::Verdict(VerdictMode::Settled);
    match field {
        VerdictField::Decision => (
            settled,
            parse_decision(value).map(|decision| Emission::Decision {
                decision,
                explicit: true,
            }),
        ),
        VerdictField::Confidence => (settled, parse_confidence(value).map(Emission::Confidence)),
        VerdictField::Reason => {
            let emission = (!value.is_empty()).then(|| Emission::Reason {
                text: value.to_string(),
                explicit: true,
                decision_hint: None,
            });
            (ParserState::Verdict(VerdictMode::ContinuingReason), emission)
        }
    }
}

fn content(state: ParserState, text: String) -> (ParserState, Option<Emission>) {
    let emission = match state {
        ParserState::None => None,
        ParserState::Strengths => Some(sourced_item(ListKind::Strengths, text)),
        ParserState::SkillGaps => Some(sourced_item(ListKind::SkillGaps, text)),
        ParserState::Improvements => Some(Emission::Item {
            list: ListKind::Improvements,
            item: ContentItem::new(text, None),
        }),
        ParserState::Questions => Some(Emission::Item {
            list: ListKind::Questions,
            item: ContentItem::new(text, Some(Provenance::Evaluator)),
        }),
        ParserState::Verdict(mode) => return verdict_line(mode, text),
    };
    (state, emission)
}

fn verdict_line(mode: VerdictMode, text: String) -> (ParserState, Option<Emission>) {
    let hint = parse_decision(&text);
    match mode {
        VerdictMode::CollectingReason if is_bare_decision(&text) => (
            ParserState::Verdict(mode),
            hint.map(|decision| Emission::Decision {
                decision,
                explicit: false,
            }),
        ),
        VerdictMode::CollectingReason => (
            ParserState::Verdict(VerdictMode::Settled),
            Some(Emission::Reason {
                text,
                explicit: false,
                decision_hint: hint,
            }),
        ),
        VerdictMode::Settled => (
            ParserState::Verdict(mode),
            hint.map(|decision| Emission::Decision {
                decision,
                explicit: false,
            }),
        ),
        VerdictMode::ContinuingReason => (
            ParserState::Verdict(mode),
            Some(Emission::ReasonContinuation(text)),
        ),
    }
}

fn sourced_item(list: ListKind, text: String) -> Emission {
    let source = infer_source(&text);
    Emission::Item {
        list,
        item: ContentItem::new(text, Some(source)),
    }
}

fn apply(draft: &mut ReportDraft, emission: Emission) {
    match emission {
        Emission::Item { list, item } => draft.push(list, item),
        Emission::Decision { decision, explicit } => draft.set_decision(decision, explicit),
        Emission::Confidence(value) => draft.set_confidence(value),
        Emission::Reason {
            text,
            explicit,
            decision_hint,
        } => {
            if let Some(decision) = decision_hint {
                draft.set_decision(decision, false);
            }
            draft.set_reason(&text, explicit);
        }
        Emission::ReasonContinuation(text) => draft.append_reason(&text),
    }
}

/// Parses evaluator free text into a report. `role` keys the question padding.
pub fn parse_report(text: &str, role: &str) -> StructuredReport {
    let mut draft = ReportDraft::new();
    let mut state = ParserState::None;

    for line in text.lines() {
        let (next, emission) = step(state, line);
        if let Some(emission) = emission {
            apply(&mut draft, emission);
        }
        state = next;
    }

    draft.finish(role)
}
