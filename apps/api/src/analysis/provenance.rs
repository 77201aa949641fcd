//! Source inference: tags a content line with the resume area it likely came from.
//!
//! Pure keyword lookup. The tag is a hint for the reader, not a claim of accuracy.

use crate::models::report::Provenance;

const SKILL_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "sql",
    "rust",
    "golang",
    "html",
    "css",
    "react",
    "node.js",
    "tensorflow",
    "pytorch",
    "keras",
    "scikit-learn",
    "pandas",
    "numpy",
    "docker",
    "kubernetes",
    "aws",
    "git",
    "linux",
    "nlp",
    "machine learning",
    "deep learning",
    "computer vision",
    "data structures",
    "algorithms",
];

const PROJECT_TERMS: &[&str] = &[
    "project",
    "projects",
    "built",
    "developed",
    "implemented",
    "prototype",
    "hackathon",
    "capstone",
    "github",
    "portfolio",
];

const EDUCATION_TERMS: &[&str] = &[
    "degree",
    "bachelor",
    "master",
    "b.tech",
    "btech",
    "university",
    "college",
    "gpa",
    "cgpa",
    "coursework",
    "academic",
    "graduate",
    "phd",
    "diploma",
];

const EXPERIENCE_TERMS: &[&str] = &[
    "experience",
    "internship",
    "intern",
    "employment",
    "employer",
    "worked",
    "company",
    "job",
    "professional",
];

/// Keyword sets in priority order. First set with a hit wins.
const SOURCE_RULES: &[(&[&str], Provenance)] = &[
    (SKILL_TERMS, Provenance::Skills),
    (PROJECT_TERMS, Provenance::Projects),
    (EDUCATION_TERMS, Provenance::Education),
    (EXPERIENCE_TERMS, Provenance::Experience),
];

/// Infers the provenance tag for a content line. Defaults to `Resume content`.
pub fn infer_source(content: &str) -> Provenance {
    let lower = content.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')))
        .map(|t| t.trim_end_matches('.'))
        .filter(|t| !t.is_empty())
        .collect();

    SOURCE_RULES
        .iter()
        .find(|(terms, _)| terms.iter().any(|term| matches_term(&lower, &tokens, term)))
        .map(|(_, tag)| *tag)
        .unwrap_or(Provenance::ResumeContent)
}

/// Multi-word terms match as phrases; single words must match a whole token.
fn matches_term(lower: &str, tokens: &[&str], term: &str) -> bool {
    if term.contains(' ') {
        lower.contains(term)
    } else {
        tokens.iter().any(|t| *t == term)
    }
}
