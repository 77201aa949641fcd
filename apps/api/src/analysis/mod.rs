//! Resume evaluation: evaluator prompting, output parsing and the safety nets
//! that guarantee every request ends with a complete `StructuredReport`.

pub mod fallback;
pub mod finalize;
pub mod handlers;
pub mod json_parser;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod provenance;
pub mod questions;
pub mod render;
pub mod sections;
pub mod text_parser;
pub mod verdict;
