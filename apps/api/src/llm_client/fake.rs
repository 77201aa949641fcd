//! Scripted `TextGenerator` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

pub enum Scripted {
    Reply(String),
    Fail,
    Hang,
}

/// Replays scripted replies in order and records every prompt it receives.
/// An exhausted script answers with `LlmError::EmptyContent`.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(replies: &[&str]) -> Self {
        Self::new(
            replies
                .iter()
                .map(|r| Scripted::Reply(r.to_string()))
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(prompt, system)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail) | None => Err(LlmError::EmptyContent),
            Some(Scripted::Hang) => {
                std::future::pending::<()>().await;
                Err(LlmError::EmptyContent)
            }
        }
    }
}
