use crate::models::report::Decision;

pub const DEFAULT_APPLICABLE_REASON: &str = "The candidate meets the core requirements for the selected role \
    based on demonstrated skills, academic background, and relevant experience.";

pub const DEFAULT_NOT_APPLICABLE_REASON: &str =
    "The candidate does not sufficiently meet the mandatory requirements for the selected role.";

/// Detects a decision phrase. "not applicable" is checked before "applicable".
pub fn parse_decision(text: &str) -> Option<Decision> {
    let lower = text.to_lowercase();
    if lower.contains("not applicable") {
        Some(Decision::NotApplicable)
    } else if lower.contains("applicable") {
        Some(Decision::Applicable)
    } else {
        None
    }
}

/// True when the line says nothing beyond the decision itself ("Not Applicable", "✅ Applicable").
pub fn is_bare_decision(text: &str) -> bool {
    let lower = text.to_lowercase();
    let Some(pos) = lower.find("applicable") else {
        return false;
    };
    let before = lower[..pos].trim_end();
    let before = before.strip_suffix("not").unwrap_or(before);
    let after = &lower[pos + "applicable".len()..];
    !before.chars().chain(after.chars()).any(char::is_alphanumeric)
}

/// Reads the first run of digits as a percentage. Values above 100 are rejected.
/// Only the integer part counts: `0.85` reads as 0 and `82.5%` as 82.
pub fn parse_confidence(text: &str) -> Option<u8> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: u32 = digits.parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v <= 100)
}

/// Default justification consistent with the decision.
pub fn default_reason(decision: Decision) -> &'static str {
    match decision {
        Decision::Applicable => DEFAULT_APPLICABLE_REASON,
        Decision::NotApplicable => DEFAULT_NOT_APPLICABLE_REASON,
    }
}
