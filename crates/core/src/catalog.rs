use crate::error::{Result, SearchError};
use crate::models::{ResultKind, SearchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordEntry {
    pub keyword: String,
    pub results: Vec<SearchResult>,
}

/// Keyword → canned results, matched by substring against the lowercased
/// query. Entries are checked in order and the first match wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordCatalog {
    entries: Vec<KeywordEntry>,
}

impl KeywordCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(entries: Vec<KeywordEntry>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(SearchError::Catalog("keyword must not be empty".to_string()));
            }
            normalized.push(KeywordEntry {
                keyword,
                results: entry.results,
            });
        }
        Ok(Self { entries: normalized })
    }

    /// Reads a JSON file shaped like `{"entries": [{"keyword": .., "results": [..]}]}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let parsed: KeywordCatalog = serde_json::from_str(&raw)?;
        Self::new(parsed.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find(&self, query: &str) -> Option<&KeywordEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let lowered = query.to_lowercase();
        self.entries
            .iter()
            .find(|entry| lowered.contains(&entry.keyword))
    }

    /// Small illustrative catalog used by the CLI when no file is given.
    pub fn demo() -> Self {
        let entries = vec![
            KeywordEntry {
                keyword: "gpt".to_string(),
                results: vec![
                    SearchResult::new(
                        "prompt-engineering",
                        "Prompt Engineering with GPT Models",
                        ResultKind::Course,
                        "Design prompts, evaluate completions and build assistants on GPT models.",
                    ),
                    SearchResult::new(
                        "gpt-in-the-classroom",
                        "GPT in the Classroom",
                        ResultKind::Blog,
                        "How instructors use GPT tutors to give faster feedback.",
                    ),
                ],
            },
            KeywordEntry {
                keyword: "llama".to_string(),
                results: vec![SearchResult::new(
                    "open-weight-llms",
                    "Running Llama and Other Open-Weight LLMs",
                    ResultKind::Course,
                    "Serve and fine-tune Llama models on your own hardware.",
                )],
            },
            KeywordEntry {
                keyword: "tensorflow".to_string(),
                results: vec![SearchResult::new(
                    "deep-learning-tensorflow",
                    "Deep Learning with TensorFlow",
                    ResultKind::Course,
                    "Build, train and deploy neural networks with TensorFlow.",
                )],
            },
        ];
        Self { entries }
    }
}

/// Shown when the endpoint keeps answering with something that is not JSON.
pub fn fallback_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new(
            "getting-started",
            "Getting Started with Online Learning",
            ResultKind::Course,
            "Search is temporarily unavailable. Start with our most popular introductory course.",
        ),
        SearchResult::new(
            "learning-tips",
            "Ten Tips for Effective Self-Paced Learning",
            ResultKind::Blog,
            "Search is temporarily unavailable. Browse study tips from the community blog.",
        ),
    ]
}
