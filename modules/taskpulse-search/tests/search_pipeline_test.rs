// End-to-end pipeline tests with mock collaborators: no network, no API
// keys. Covers the degraded (analyzer down) path, the analyzer-assisted
// path, permission filtering, and response metadata.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use taskpulse_core::{
    DateAnalysis, EnrichedQuery, LanguageAnalyzer, PromptRegistry, RankedResult, SearchQuery,
    TaskPage, TaskPulseError, TaskRetriever,
};
use taskpulse_search::{SearchDeps, SearchService};

struct MockAnalyzer {
    available: bool,
    target_date: String,
    calls: AtomicU32,
}

impl MockAnalyzer {
    fn down() -> Self {
        Self {
            available: false,
            target_date: String::new(),
            calls: AtomicU32::new(0),
        }
    }

    fn resolving(target_date: &str) -> Self {
        Self {
            available: true,
            target_date: target_date.to_string(),
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl LanguageAnalyzer for MockAnalyzer {
    async fn analyze_date(&self, _prompt: &str, _input: &str) -> Result<DateAnalysis> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !self.available {
            return Err(anyhow!("service unavailable"));
        }
        Ok(DateAnalysis {
            target_date: self.target_date.clone(),
            confidence: 0.9,
            interpretation: "resolved by mock".to_string(),
        })
    }

    async fn probe_documents(&self, _prompt: &str, _query: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !self.available {
            return Err(anyhow!("service unavailable"));
        }
        Ok(vec!["login flow".to_string()])
    }
}

struct MockRetriever {
    candidates: Vec<RankedResult<TaskPage>>,
}

#[async_trait]
impl TaskRetriever for MockRetriever {
    async fn retrieve(&self, _query: &EnrichedQuery) -> Result<Vec<RankedResult<TaskPage>>> {
        Ok(self.candidates.clone())
    }
}

fn page(id: &str) -> TaskPage {
    TaskPage {
        id: id.to_string(),
        title: format!("Task {id}"),
        archived: false,
        created_time: Some(Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()),
        status: Some("In Progress".to_string()),
        content: None,
        url: None,
    }
}

fn candidate(id: &str, relevance: f64, proximity: f64) -> RankedResult<TaskPage> {
    RankedResult {
        page: page(id),
        relevance_score: relevance,
        date_proximity_score: proximity,
        combined_score: 0.0,
    }
}

fn service(analyzer: MockAnalyzer, candidates: Vec<RankedResult<TaskPage>>) -> SearchService {
    SearchService::new(SearchDeps {
        analyzer: Arc::new(analyzer),
        retriever: Arc::new(MockRetriever { candidates }),
        prompts: Arc::new(PromptRegistry::new()),
    })
}

fn query(description: &str, relative_date: Option<&str>) -> SearchQuery {
    SearchQuery {
        description: description.to_string(),
        relative_date: relative_date.map(|d| d.to_string()),
        user_id: "user-1".to_string(),
        database_id: "db-1".to_string(),
        max_results: None,
        include_content: None,
    }
}

#[tokio::test]
async fn degraded_search_falls_back_and_still_ranks() {
    let service = service(
        MockAnalyzer::down(),
        vec![
            candidate("low", 0.2, 0.1),
            candidate("high", 0.9, 0.8),
            candidate("mid", 0.5, 0.4),
        ],
    );

    let response = service
        .search(query("Fix the login bug", Some("3 days ago")))
        .await
        .unwrap();

    // Fallback keyword extraction annotated the description.
    assert!(response.query.description.starts_with("Fix the login bug [Keywords:"));
    for keyword in ["fix", "login", "bug"] {
        assert!(response.query.keywords.contains(&keyword.to_string()), "{keyword}");
    }

    // Fallback date parsing resolved the relative expression.
    let target = response.query.parsed_target_date.expect("target date");
    assert!(Utc::now() - target >= Duration::days(3) - Duration::minutes(1));
    assert!(Utc::now() - target <= Duration::days(3) + Duration::minutes(1));

    // Ranked descending despite both collaborator calls failing.
    let ids: Vec<&str> = response.results.iter().map(|r| r.page.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);

    // One probe plus one date analysis attempt.
    assert_eq!(response.metadata.analyzer_calls, 2);
    assert_eq!(response.total_count, 3);
}

#[tokio::test]
async fn analyzer_date_takes_precedence_over_rules() {
    let service = service(
        MockAnalyzer::resolving("2026-01-15T00:00:00Z"),
        vec![candidate("a", 0.5, 1.0)],
    );

    let response = service
        .search(query("Review roadmap", Some("around mid january")))
        .await
        .unwrap();

    assert_eq!(
        response.query.parsed_target_date,
        Some(Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap())
    );

    // Date-specified preset: 0.3 * relevance + 0.7 * proximity.
    let result = &response.results[0];
    assert!((result.combined_score - (0.3 * 0.5 + 0.7 * 1.0)).abs() < 1e-9);
}

#[tokio::test]
async fn date_absent_preset_ignores_proximity() {
    let service = service(
        MockAnalyzer::down(),
        vec![candidate("a", 0.6, 1.0)],
    );

    let response = service.search(query("Review roadmap", None)).await.unwrap();

    assert_eq!(response.query.parsed_target_date, None);
    assert!((response.results[0].combined_score - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn unparseable_relative_date_degrades_to_no_date() {
    let service = service(MockAnalyzer::down(), vec![candidate("a", 0.6, 1.0)]);

    let response = service
        .search(query("Review roadmap", Some("not a date")))
        .await
        .unwrap();

    assert_eq!(response.query.parsed_target_date, None);
}

#[tokio::test]
async fn archived_and_incomplete_items_are_filtered() {
    let mut archived = candidate("archived", 0.9, 0.9);
    archived.page.archived = true;
    let mut no_created = candidate("no-created", 0.8, 0.8);
    no_created.page.created_time = None;
    let mut no_id = candidate("", 0.7, 0.7);
    no_id.page.id = String::new();
    let visible = candidate("visible", 0.5, 0.5);

    let service = service(
        MockAnalyzer::down(),
        vec![archived, no_created, no_id, visible],
    );

    let response = service.search(query("cleanup", None)).await.unwrap();

    assert_eq!(response.total_count, 1);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].page.id, "visible");
}

#[tokio::test]
async fn blank_user_id_is_a_validation_error() {
    let service = service(MockAnalyzer::down(), vec![candidate("a", 0.5, 0.5)]);

    let mut q = query("anything", None);
    q.user_id = "   ".to_string();

    let err = service.search(q).await.unwrap_err();
    assert!(matches!(err, TaskPulseError::Validation(_)));
}

#[tokio::test]
async fn empty_description_is_a_validation_error() {
    let service = service(MockAnalyzer::down(), vec![]);

    let err = service.search(query("   ", None)).await.unwrap_err();
    assert!(matches!(err, TaskPulseError::Validation(_)));
}

#[tokio::test]
async fn default_max_results_caps_the_response() {
    let candidates: Vec<_> = (0..12)
        .map(|i| candidate(&format!("t{i}"), 0.5 + (i as f64) * 0.01, 0.0))
        .collect();
    let service = service(MockAnalyzer::down(), candidates);

    let response = service.search(query("backlog review", None)).await.unwrap();

    assert_eq!(response.total_count, 12);
    assert_eq!(response.results.len(), 10);
    assert!(response.query.include_content);
    assert_eq!(response.query.max_results, 10);
}

#[tokio::test]
async fn metadata_records_processing_steps() {
    let service = service(MockAnalyzer::down(), vec![candidate("a", 0.5, 0.5)]);

    let response = service.search(query("anything", None)).await.unwrap();

    assert_eq!(response.metadata.steps.len(), 4);
    assert!(response.metadata.steps[0].starts_with("enhanced query"));
    assert!(response.metadata.steps[1].starts_with("retrieved 1"));
    // Probe only — no relative date was supplied.
    assert_eq!(response.metadata.analyzer_calls, 1);
}
