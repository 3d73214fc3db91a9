//! Query enhancement: keyword annotation plus target-date parsing.

use std::sync::Arc;

use taskpulse_core::{EnrichedQuery, LanguageAnalyzer, PromptRegistry, SearchQuery};

use crate::date::DateInterpreter;
use crate::keywords::KeywordExtractor;

const DEFAULT_MAX_RESULTS: usize = 10;

/// Composes the date interpreter and keyword extractor into an enriched
/// query for retrieval.
pub struct QueryEnhancer {
    dates: DateInterpreter,
    keywords: KeywordExtractor,
}

impl QueryEnhancer {
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, prompts: Arc<PromptRegistry>) -> Self {
        Self {
            dates: DateInterpreter::new(analyzer.clone(), prompts.clone()),
            keywords: KeywordExtractor::new(analyzer, prompts),
        }
    }

    /// Build an enriched copy of `query`. Never fails: sub-operation
    /// failures degrade to an unannotated description or an absent date.
    pub async fn enhance(&self, query: &SearchQuery) -> EnrichedQuery {
        let keywords = self.keywords.extract(&query.description).await;

        let description = if keywords.is_empty() {
            query.description.clone()
        } else {
            format!("{} [Keywords: {}]", query.description, keywords.join(" "))
        };

        let parsed_target_date = match &query.relative_date {
            Some(expression) => self.dates.parse(expression).await,
            None => None,
        };

        EnrichedQuery {
            description,
            keywords,
            parsed_target_date,
            user_id: query.user_id.clone(),
            database_id: query.database_id.clone(),
            max_results: query.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            include_content: query.include_content.unwrap_or(true),
        }
    }
}
