use serde::{Deserialize, Serialize};

/// Maximum entries kept in any report list.
pub const MAX_LIST_ITEMS: usize = 5;
/// Minimum interview questions on a parsed report.
pub const MIN_INTERVIEW_QUESTIONS: usize = 3;

/// Heuristic label for the resume area a content item most likely came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "Skills section")]
    Skills,
    #[serde(rename = "Projects section")]
    Projects,
    #[serde(rename = "Education section")]
    Education,
    #[serde(rename = "Experience section")]
    Experience,
    #[serde(rename = "Resume content")]
    ResumeContent,
    #[serde(rename = "Evaluator")]
    Evaluator,
    #[serde(rename = "System generated")]
    SystemGenerated,
}

impl Provenance {
    pub fn label(self) -> &'static str {
        match self {
            Provenance::Skills => "Skills section",
            Provenance::Projects => "Projects section",
            Provenance::Education => "Education section",
            Provenance::Experience => "Experience section",
            Provenance::ResumeContent => "Resume content",
            Provenance::Evaluator => "Evaluator",
            Provenance::SystemGenerated => "System generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
}

impl ContentItem {
    pub fn new(text: impl Into<String>, source: Option<Provenance>) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Applicable,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Applicable => "Applicable",
            Decision::NotApplicable => "Not Applicable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    /// Percentage in `[0, 100]`; `None` when the evaluator gave no figure.
    pub confidence: Option<u8>,
    pub reason: String,
}

/// The typed evaluation returned for one resume. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub strengths: Vec<ContentItem>,
    pub skill_gaps: Vec<ContentItem>,
    pub improvement_suggestions: Vec<ContentItem>,
    pub interview_questions: Vec<ContentItem>,
    pub final_verdict: Verdict,
}
