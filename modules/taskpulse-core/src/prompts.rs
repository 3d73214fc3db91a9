//! Static instruction templates for the language-analysis collaborator.
//!
//! Template bodies are configuration data: the prose may evolve, but the
//! `{{query}}`, `{{dateInput}}`, `{{currentDate}}`, `{{targetDate}}`,
//! `{{dateWeight}}` and `{{results}}` placeholders are load-bearing.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::TaskPulseError;
use crate::template::validate_template;

/// Analysis tasks with a registered prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptType {
    SemanticSearch,
    DateAnalysis,
    ResultRanking,
}

impl PromptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SemanticSearch => "semantic-search",
            Self::DateAnalysis => "date-analysis",
            Self::ResultRanking => "result-ranking",
        }
    }
}

const SEMANTIC_SEARCH_TEMPLATE: &str = "\
You are a task search assistant. Identify the semantic intent of the user \
query below and the key concepts that should drive retrieval.

Query: {{query}}

List the most relevant concepts, one per line.";

const DATE_ANALYSIS_TEMPLATE: &str = "\
You are a date interpretation assistant. Resolve the date expression below \
to a concrete calendar date.

Expression: {{dateInput}}
Current date: {{currentDate}}

Return the target date in ISO 8601 format, a confidence between 0 and 1, \
and a short interpretation of how you read the expression.";

const RESULT_RANKING_TEMPLATE: &str = "\
You are a task ranking assistant. Order the candidate results below by how \
well each matches the target date {{targetDate}}, weighting date proximity \
at {{dateWeight}}.

Candidates:
{{results}}

Return the candidates from best to worst match.";

/// Registration table. A body that fails validation counts as
/// unregistered.
fn builtin_template(prompt_type: PromptType) -> Option<&'static str> {
    let body = match prompt_type {
        PromptType::SemanticSearch => SEMANTIC_SEARCH_TEMPLATE,
        PromptType::DateAnalysis => DATE_ANALYSIS_TEMPLATE,
        PromptType::ResultRanking => RESULT_RANKING_TEMPLATE,
    };
    validate_template(body).then_some(body)
}

/// Process-wide template cache: populated lazily on first access, safe
/// for concurrent reads, clearable on demand.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    cache: RwLock<HashMap<PromptType, String>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, prompt_type: PromptType) -> Result<String, TaskPulseError> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&prompt_type)
        {
            return Ok(cached.clone());
        }

        let body = builtin_template(prompt_type)
            .ok_or_else(|| TaskPulseError::UnknownTemplate(prompt_type.as_str().to_string()))?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt_type, body.to_string());

        Ok(body.to_string())
    }

    /// Drop all cached templates; the next `get` re-registers.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
