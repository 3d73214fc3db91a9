//! Semantic keyword extraction with a rule-based fallback.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use taskpulse_core::{format_template, LanguageAnalyzer, PromptRegistry, PromptType};

/// Closed list of common English function words excluded from keywords.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we",
    "they",
];

/// Trigger substrings and the domain keywords they pull in.
const DOMAIN_TERMS: &[(&[&str], &[&str])] = &[
    (&["bug", "fix"], &["bug", "fix", "issue"]),
    (
        &["feature", "implement"],
        &["feature", "implementation", "development"],
    ),
    (&["test", "testing"], &["test", "testing", "qa"]),
];

/// Derives deduplicated semantic keywords from a task description,
/// consulting the language-analysis collaborator when available.
pub struct KeywordExtractor {
    analyzer: Arc<dyn LanguageAnalyzer>,
    prompts: Arc<PromptRegistry>,
}

impl KeywordExtractor {
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, prompts: Arc<PromptRegistry>) -> Self {
        Self { analyzer, prompts }
    }

    /// Extract keywords. Never fails; collaborator errors switch to the
    /// local rule-based extractor.
    pub async fn extract(&self, description: &str) -> Vec<String> {
        if description.trim().is_empty() {
            return Vec::new();
        }

        match self.probe(description).await {
            Ok(matches) => {
                debug!(matches = matches.len(), "semantic probe succeeded");
                semantic_keywords(description)
            }
            Err(err) => {
                debug!(error = %err, "semantic probe unavailable, using rule-based extraction");
                fallback_keywords(description)
            }
        }
    }

    async fn probe(&self, description: &str) -> anyhow::Result<Vec<String>> {
        let template = self.prompts.get(PromptType::SemanticSearch)?;
        let vars = [("query".to_string(), json!(description))]
            .into_iter()
            .collect();
        let prompt = format_template(&template, &vars)?;
        self.analyzer.probe_documents(&prompt, description).await
    }
}

/// Keyword derivation for the semantic path: alphabetic tokens longer
/// than three characters plus domain trigger terms.
pub fn semantic_keywords(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in lower.split_whitespace() {
        if token.len() > 3
            && token.chars().all(|c| c.is_ascii_alphabetic())
            && !STOP_WORDS.contains(&token)
            && seen.insert(token.to_string())
        {
            keywords.push(token.to_string());
        }
    }

    for (triggers, additions) in DOMAIN_TERMS {
        if triggers.iter().any(|t| lower.contains(t)) {
            for addition in *additions {
                if seen.insert((*addition).to_string()) {
                    keywords.push((*addition).to_string());
                }
            }
        }
    }

    keywords
}

/// Rule-based extraction: punctuation stripped to whitespace, tokens
/// longer than two characters, stop-words removed.
pub fn fallback_keywords(description: &str) -> Vec<String> {
    let lower: String = description
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in lower.split_whitespace() {
        if token.len() > 2 && !STOP_WORDS.contains(&token) && seen.insert(token.to_string()) {
            keywords.push(token.to_string());
        }
    }

    keywords
}
