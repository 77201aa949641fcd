//! Retrieval: role expectation snippets for the evaluator prompt.
//!
//! `AppState` holds an `Arc<RoleLibrary>`; the pipeline only sees `dyn Retriever`,
//! so a vector-store backend can replace `KeywordRetriever` without touching callers.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::questions::ROLE_PROFILES;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to read role expectations from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("retrieval backend unavailable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Up to `k` snippets most relevant to `query`. An empty result is valid.
    async fn query(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError>;
}

/// Ranks expectation lines by how many distinct query tokens they share.
/// Ties keep file order.
#[derive(Debug, Default, Clone)]
pub struct KeywordRetriever {
    documents: Vec<String>,
}

impl KeywordRetriever {
    pub fn from_text(text: &str) -> Self {
        Self {
            documents: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn rank(&self, query: &str, k: usize) -> Vec<String> {
        let query_tokens: HashSet<String> = tokenize(query).collect();

        let mut scored: Vec<(usize, &String)> = self
            .documents
            .iter()
            .map(|doc| {
                let doc_tokens: HashSet<String> = tokenize(doc).collect();
                (doc_tokens.intersection(&query_tokens).count(), doc)
            })
            .collect();
        // sort_by is stable, so equal scores stay in file order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored.into_iter().take(k).map(|(_, d)| d.clone()).collect()
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn query(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        Ok(self.rank(query, k))
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Role name -> expectation retriever. Lookups ignore ASCII case.
pub struct RoleLibrary {
    retrievers: HashMap<String, Arc<dyn Retriever>>,
    empty: Arc<dyn Retriever>,
}

impl RoleLibrary {
    /// Loads one expectations file per known role from `dir`.
    /// A missing file yields an empty retriever; other read errors are returned.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let dir = dir.as_ref();
        let mut retrievers: HashMap<String, Arc<dyn Retriever>> = HashMap::new();

        for profile in ROLE_PROFILES {
            let path = dir.join(profile.expectations_file);
            let retriever = match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let retriever = KeywordRetriever::from_text(&text);
                    if retriever.is_empty() {
                        warn!(
                            "Role expectations file {} has no expectation lines",
                            path.display()
                        );
                    }
                    retriever
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(
                        "Role expectations file {} not found, '{}' will use no expectations",
                        path.display(),
                        profile.name
                    );
                    KeywordRetriever::default()
                }
                Err(source) => {
                    return Err(RetrievalError::Io {
                        path: path.display().to_string(),
                        source,
                    })
                }
            };
            info!(
                "Loaded {} expectation lines for role '{}'",
                retriever.len(),
                profile.name
            );
            retrievers.insert(profile.name.to_ascii_lowercase(), Arc::new(retriever));
        }

        Ok(Self {
            retrievers,
            empty: Arc::new(KeywordRetriever::default()),
        })
    }

    /// Builds a library from explicit retrievers. Used by tests and alternative backends.
    pub fn from_retrievers(entries: Vec<(String, Arc<dyn Retriever>)>) -> Self {
        Self {
            retrievers: entries
                .into_iter()
                .map(|(name, r)| (name.trim().to_ascii_lowercase(), r))
                .collect(),
            empty: Arc::new(KeywordRetriever::default()),
        }
    }

    /// The retriever for `role`, or an empty one for roles without expectations.
    pub fn retriever_for(&self, role: &str) -> Arc<dyn Retriever> {
        self.retrievers
            .get(&role.trim().to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| self.empty.clone())
    }

    /// Known role names in display form.
    pub fn role_names(&self) -> Vec<&'static str> {
        ROLE_PROFILES.iter().map(|p| p.name).collect()
    }
}
