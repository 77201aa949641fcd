//! Section classification for evaluator free text.
//!
//! Header matching is case-insensitive and tolerates decorative numbering, markdown
//! bold and `#` heading marks. A header term must open the line, or follow at most
//! two qualifier words such as "Key", and be followed by end-of-line, a colon or a
//! dash. A line like "Describe your strengths" stays content.

use crate::analysis::normalize::normalize_line;

/// Logical report division a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Strengths,
    SkillGaps,
    Improvements,
    Questions,
    Verdict,
}

/// Labelled field inside the verdict block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictField {
    Decision,
    Confidence,
    Reason,
}

/// Result of classifying one line against the current section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Decorative or whitespace-only line.
    Blank,
    /// Section header. `inline` holds any text after the header's colon.
    Header {
        section: Section,
        inline: Option<String>,
    },
    /// `Decision:` / `Confidence:` / `Reason:` line inside the verdict block.
    Field { field: VerdictField, value: String },
    /// Normalized content text.
    Content(String),
}

/// Ordered header vocabulary. First match wins.
const HEADERS: &[(&str, Section)] = &[
    ("strengths", Section::Strengths),
    ("skill gaps", Section::SkillGaps),
    ("improvement suggestions", Section::Improvements),
    ("interview questions", Section::Questions),
    ("final verdict", Section::Verdict),
];

/// Label variants, longest first so `reasons` is tried before `reason`.
const VERDICT_FIELDS: &[(&str, VerdictField)] = &[
    ("decisions", VerdictField::Decision),
    ("decision", VerdictField::Decision),
    ("confidence", VerdictField::Confidence),
    ("reasoning", VerdictField::Reason),
    ("reasons", VerdictField::Reason),
    ("reason", VerdictField::Reason),
];

/// Words that may precede a header term ("Key Strengths", "Candidate Skill Gaps").
/// Any other leading word makes the line content.
const HEADER_QUALIFIERS: &[&str] = &[
    "key",
    "main",
    "top",
    "core",
    "major",
    "notable",
    "overall",
    "technical",
    "candidate",
    "candidate's",
    "identified",
    "potential",
    "suggested",
    "recommended",
];

const MAX_HEADER_PREFIX_WORDS: usize = 2;

/// Extra words allowed in a compound header ("Strengths & Achievements:").
const MAX_COMPOUND_WORDS: usize = 2;

/// Classifies one raw line. Verdict fields are only recognized while `current`
/// is [`Section::Verdict`], and take precedence over headers there.
pub fn classify(line: &str, current: Section) -> LineKind {
    let normalized = normalize_line(line);
    if normalized.is_empty() {
        return LineKind::Blank;
    }

    if current == Section::Verdict {
        if let Some((field, value)) = match_verdict_field(&normalized) {
            return LineKind::Field { field, value };
        }
    }

    let heading =
        normalize_line(normalized.trim_start_matches(|c: char| c == '#' || c.is_whitespace()));
    if let Some((section, inline)) = match_header(&heading) {
        return LineKind::Header { section, inline };
    }

    LineKind::Content(normalized)
}

fn match_header(line: &str) -> Option<(Section, Option<String>)> {
    // ASCII lowercasing keeps byte offsets aligned with `line`.
    let lower = line.to_ascii_lowercase();

    for &(term, section) in HEADERS {
        let Some(pos) = lower.find(term) else {
            continue;
        };
        let prefix = &lower[..pos];
        if !prefix.is_empty() && !prefix.ends_with(char::is_whitespace) {
            continue;
        }
        let mut prefix_words = prefix.split_whitespace();
        if prefix.split_whitespace().count() > MAX_HEADER_PREFIX_WORDS
            || !prefix_words.all(|w| HEADER_QUALIFIERS.contains(&w))
        {
            continue;
        }
        if let Some(inline) = header_tail(&line[pos + term.len()..]) {
            return Some((section, inline));
        }
    }
    None
}

/// Returns `Some(inline)` when the text after a header term closes the header,
/// `None` when the term was part of a sentence.
fn header_tail(after: &str) -> Option<Option<String>> {
    let mut tail = after.trim_start_matches(|c: char| c == '*' || c.is_whitespace());

    // "Interview Questions (role-specific):"
    if tail.starts_with('(') {
        let close = tail.find(')')?;
        tail = tail[close + 1..].trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    }

    if tail.is_empty() {
        return Some(None);
    }

    if let Some(rest) = compound_rest(tail) {
        // "Strengths & Achievements:" needs its colon
        let (words, value) = rest.split_once(':')?;
        let count = words.split_whitespace().count();
        if count == 0 || count > MAX_COMPOUND_WORDS {
            return None;
        }
        let inline = clean_value(value);
        return Some((!inline.is_empty()).then_some(inline));
    }

    let delimiter = tail.chars().next()?;
    if !matches!(delimiter, ':' | '-' | '–' | '—') {
        return None;
    }

    let inline = clean_value(&tail[delimiter.len_utf8()..]);
    Some((!inline.is_empty()).then_some(inline))
}

/// Text after a leading `&` or `and `, if any.
fn compound_rest(tail: &str) -> Option<&str> {
    if let Some(rest) = tail.strip_prefix('&') {
        return Some(rest);
    }
    let head = tail.get(..4)?;
    head.eq_ignore_ascii_case("and ").then(|| &tail[4..])
}

fn match_verdict_field(line: &str) -> Option<(VerdictField, String)> {
    let lower = line.to_ascii_lowercase();

    for &(label, field) in VERDICT_FIELDS {
        if !lower.starts_with(label) {
            continue;
        }
        let rest = &line[label.len()..];
        if rest.chars().next().is_some_and(char::is_alphanumeric) {
            continue;
        }
        return field_value(rest).map(|value| (field, value));
    }
    None
}

/// Value after a field label. The label must end the line, or be followed by a
/// colon or dash, or by one qualifier word and a colon ("Confidence Level: 80%").
/// "Reasoning is sound" has none of these and is not a field.
fn field_value(rest: &str) -> Option<String> {
    let rest = rest.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    let mut chars = rest.chars();
    match chars.next() {
        None => return Some(String::new()),
        Some(':' | '-' | '–' | '—') => return Some(clean_value(chars.as_str())),
        Some(_) => {}
    }

    let (qualifier, value) = rest.split_once(':')?;
    (qualifier.split_whitespace().count() == 1).then(|| clean_value(value))
}

fn clean_value(value: &str) -> String {
    value
        .trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}
