// Collaborator seams for the search core.
//
// LanguageAnalyzer — the external text-understanding service.
// TaskRetriever — candidate retrieval from the workspace tool.
//
// Both sit behind async traits so pipeline tests run against mocks:
// no network, no API keys. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{DateAnalysis, EnrichedQuery, RankedResult, TaskPage};

#[async_trait]
pub trait LanguageAnalyzer: Send + Sync {
    /// Resolve a date expression using the given instruction prompt.
    /// May fail or be unreachable at any time; callers degrade to
    /// rule-based parsing.
    async fn analyze_date(&self, prompt: &str, input: &str) -> Result<DateAnalysis>;

    /// Probe the document corpus for semantic cues about a query.
    async fn probe_documents(&self, prompt: &str, query: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait TaskRetriever: Send + Sync {
    /// Fetch candidate tasks for an enriched query, each carrying raw
    /// relevance and date-proximity scores. How the scores are computed
    /// is the retriever's concern.
    async fn retrieve(&self, query: &EnrichedQuery) -> Result<Vec<RankedResult<TaskPage>>>;
}
