use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use ai_client::OpenAi;

use crate::config::AnalysisModels;
use crate::traits::LanguageAnalyzer;
use crate::types::DateAnalysis;

/// Structured response shape for the semantic probe.
#[derive(Debug, Deserialize, JsonSchema)]
struct ProbeFindings {
    /// Concepts or document titles relevant to the query.
    matches: Vec<String>,
}

/// `LanguageAnalyzer` backed by the OpenAI-compatible agent.
pub struct OpenAiAnalyzer {
    agent: Arc<OpenAi>,
    models: AnalysisModels,
}

impl OpenAiAnalyzer {
    pub fn new(agent: Arc<OpenAi>, models: AnalysisModels) -> Self {
        Self { agent, models }
    }
}

#[async_trait]
impl LanguageAnalyzer for OpenAiAnalyzer {
    async fn analyze_date(&self, prompt: &str, input: &str) -> Result<DateAnalysis> {
        debug!(model = %self.models.date_analysis, input = %input, "date analysis request");
        self.agent
            .extract(&self.models.date_analysis, prompt, input)
            .await
    }

    async fn probe_documents(&self, prompt: &str, query: &str) -> Result<Vec<String>> {
        debug!(model = %self.models.semantic_search, "semantic probe request");
        let findings: ProbeFindings = self
            .agent
            .extract(&self.models.semantic_search, prompt, query)
            .await?;
        Ok(findings.matches)
    }
}
