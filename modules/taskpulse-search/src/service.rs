//! Search pipeline entry point.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use taskpulse_core::{
    DateAnalysis, EnrichedQuery, LanguageAnalyzer, PromptRegistry, RankedResult, SearchMetadata,
    SearchQuery, SearchResponse, TaskPage, TaskPulseError, TaskRetriever,
};

use crate::enhance::QueryEnhancer;
use crate::ranking::{check_permissions, combine_scores, order_by_score, ranking_criteria};

/// Central dependency container for the search pipeline.
#[derive(Clone)]
pub struct SearchDeps {
    pub analyzer: Arc<dyn LanguageAnalyzer>,
    pub retriever: Arc<dyn TaskRetriever>,
    pub prompts: Arc<PromptRegistry>,
}

/// Wraps the analyzer to count collaborator calls for one request's
/// metadata.
struct CountingAnalyzer {
    inner: Arc<dyn LanguageAnalyzer>,
    calls: AtomicU32,
}

impl CountingAnalyzer {
    fn new(inner: Arc<dyn LanguageAnalyzer>) -> Self {
        Self {
            inner,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LanguageAnalyzer for CountingAnalyzer {
    async fn analyze_date(&self, prompt: &str, input: &str) -> Result<DateAnalysis> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.analyze_date(prompt, input).await
    }

    async fn probe_documents(&self, prompt: &str, query: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.probe_documents(prompt, query).await
    }
}

pub struct SearchService {
    deps: SearchDeps,
}

impl SearchService {
    pub fn new(deps: SearchDeps) -> Self {
        Self { deps }
    }

    /// Run the full pipeline: enhance, retrieve, score, order, filter.
    ///
    /// Analyzer failures degrade to rule-based enhancement; retrieval
    /// failures and validation problems surface to the caller.
    pub async fn search(
        &self,
        query: SearchQuery,
    ) -> Result<SearchResponse<TaskPage>, TaskPulseError> {
        if query.description.trim().is_empty() {
            return Err(TaskPulseError::Validation(
                "search description must not be empty".to_string(),
            ));
        }

        let start = Instant::now();
        let mut steps = Vec::new();

        let analyzer = Arc::new(CountingAnalyzer::new(self.deps.analyzer.clone()));
        let enhancer = QueryEnhancer::new(analyzer.clone(), self.deps.prompts.clone());

        let enriched = enhancer.enhance(&query).await;
        steps.push(format!(
            "enhanced query: {} keywords, target date {}",
            enriched.keywords.len(),
            enriched
                .parsed_target_date
                .map_or_else(|| "absent".to_string(), |d| d.format("%Y-%m-%d").to_string()),
        ));

        let candidates = self.retrieve(&enriched).await?;
        steps.push(format!("retrieved {} candidates", candidates.len()));

        let criteria = ranking_criteria(
            enriched.parsed_target_date.is_some(),
            enriched.max_results,
        );
        let ordered = order_by_score(combine_scores(candidates, &criteria));
        steps.push("combined and ordered scores".to_string());

        let permitted = check_permissions(ordered, &enriched.user_id).await?;
        let total_count = permitted.len();
        steps.push(format!("permission filter kept {total_count} results"));

        let results: Vec<RankedResult<TaskPage>> = permitted
            .into_iter()
            .take(criteria.max_results)
            .collect();
        let search_time_ms = start.elapsed().as_millis() as u64;

        info!(
            total = total_count,
            returned = results.len(),
            took_ms = search_time_ms,
            "search completed"
        );

        Ok(SearchResponse {
            results,
            total_count,
            search_time_ms,
            query: enriched,
            metadata: SearchMetadata {
                analyzer_calls: analyzer.calls(),
                steps,
            },
        })
    }

    async fn retrieve(
        &self,
        enriched: &EnrichedQuery,
    ) -> Result<Vec<RankedResult<TaskPage>>, TaskPulseError> {
        Ok(self.deps.retriever.retrieve(enriched).await?)
    }
}
