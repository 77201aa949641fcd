//! Resume intake: turns uploaded PDFs and structured JSON resumes into the plain
//! text the analysis pipeline consumes.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;

/// Flattens a structured resume into labelled sections.
///
/// Each top-level key becomes a `KEY:` line followed by its content and a blank line.
/// Array entries are bulleted; objects inside arrays contribute one bullet per field.
pub fn json_to_resume_text(resume: &Map<String, Value>) -> String {
    let mut text = String::new();

    for (key, value) in resume {
        text.push_str(&key.to_uppercase());
        text.push_str(":\n");

        match value {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(fields) => {
                            for (k, v) in fields {
                                text.push_str(&format!("- {k}: {}\n", scalar_text(v)));
                            }
                        }
                        other => text.push_str(&format!("- {}\n", scalar_text(other))),
                    }
                }
            }
            Value::Object(fields) => {
                for (k, v) in fields {
                    text.push_str(&format!("{k}: {}\n", scalar_text(v)));
                }
            }
            other => {
                text.push_str(&scalar_text(other));
                text.push('\n');
            }
        }

        text.push('\n');
    }

    text
}

/// Strings render bare; everything else renders as compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extracts the text layer of a PDF. Scanned PDFs without text come back empty,
/// which the caller rejects like any other empty resume.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;
    debug!("Extracted {} characters from PDF", text.len());
    Ok(text)
}
