//! Line normalization: strips list markers and markdown bold from evaluator lines.

/// Glyphs that may lead a bullet line.
const BULLET_GLYPHS: &[char] = &['-', '*', '•', '.', ')'];

/// Normalizes one raw evaluator line into its content text.
///
/// Strips leading bullet glyphs (`-`, `*`, `•`, `.`, `)`), numbering markers
/// (`1.`, `2)`) and `**` bold markers, repeating until nothing changes so the
/// result is a fixed point. Lines with no alphanumeric character are decorative
/// and normalize to the empty string.
pub fn normalize_line(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.chars().any(char::is_alphanumeric) {
        current
    } else {
        String::new()
    }
}

fn strip_once(line: &str) -> String {
    let collapsed = line.replace("**", "");
    let mut rest =
        collapsed.trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c.is_whitespace());
    rest = strip_numbering(rest);
    rest.trim().to_string()
}

/// Removes a leading `12.` / `3)` marker. A digit run only counts as a marker when
/// the `.` or `)` after it ends the token, so `5+ years` and `1.5 years` survive.
fn strip_numbering(line: &str) -> &str {
    let digits_end = line
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    if digits_end == 0 {
        return line;
    }

    let after = &line[digits_end..];
    let mut chars = after.chars();
    match (chars.next(), chars.next()) {
        (Some('.' | ')'), None) => "",
        (Some('.' | ')'), Some(c)) if c.is_whitespace() => after[1..].trim_start(),
        (None, _) => "",
        _ => line,
    }
}
