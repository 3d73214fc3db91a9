use anyhow::Result;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for one search request. Owned by the caller;
/// enhancement produces a new `EnrichedQuery` and never mutates this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_date: Option<String>,
    pub user_id: String,
    pub database_id: String,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub include_content: Option<bool>,
}

/// A search query after enhancement: keyword-annotated description,
/// parsed target date, defaults applied.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedQuery {
    pub description: String,
    pub keywords: Vec<String>,
    pub parsed_target_date: Option<DateTime<Utc>>,
    pub user_id: String,
    pub database_id: String,
    pub max_results: usize,
    pub include_content: bool,
}

/// Structured response from the language-analysis collaborator for a date
/// expression. Transient; never persisted.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DateAnalysis {
    /// Resolved date in ISO 8601 format.
    pub target_date: String,
    /// Confidence in the interpretation, 0 to 1.
    pub confidence: f64,
    /// Short explanation of how the expression was read.
    pub interpretation: String,
}

/// Weights and limits applied when combining scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingCriteria {
    pub semantic_weight: f64,
    pub date_weight: f64,
    pub max_results: usize,
}

/// A candidate item with scoring metadata. Created by the retrieval
/// collaborator with raw scores; the ranking engine clamps them and
/// overwrites `combined_score`. Never mutated after sorting.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult<P> {
    pub page: P,
    pub relevance_score: f64,
    pub date_proximity_score: f64,
    pub combined_score: f64,
}

/// The slice of item state the ranking engine needs for permission
/// filtering. Accessors are fallible: adapters that resolve metadata
/// lazily may fail per item, and one bad item must not fail the batch.
pub trait ItemRef {
    fn id(&self) -> &str;
    fn is_archived(&self) -> Result<bool>;
    fn created_time(&self) -> Result<Option<DateTime<Utc>>>;
}

/// A task page as surfaced by the external workspace tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub id: String,
    pub title: String,
    pub archived: bool,
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ItemRef for TaskPage {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_archived(&self) -> Result<bool> {
        Ok(self.archived)
    }

    fn created_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.created_time)
    }
}

/// Observability metadata for one search call. Not behaviorally
/// load-bearing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub analyzer_calls: u32,
    pub steps: Vec<String>,
}

/// Container for ranked search results with metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse<P> {
    pub results: Vec<RankedResult<P>>,
    pub total_count: usize,
    pub search_time_ms: u64,
    pub query: EnrichedQuery,
    pub metadata: SearchMetadata,
}
