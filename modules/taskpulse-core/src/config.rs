use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub models: AnalysisModels,
    pub ai_timeout_secs: u64,
}

/// Model assignments for the analysis tasks.
#[derive(Debug, Clone)]
pub struct AnalysisModels {
    pub semantic_search: String,
    pub date_analysis: String,
}

impl Default for AnalysisModels {
    fn default() -> Self {
        Self {
            semantic_search: "gpt-4o-mini".to_string(),
            date_analysis: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: required_env("OPENAI_API_KEY"),
            models: AnalysisModels {
                semantic_search: env::var("SEMANTIC_SEARCH_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                date_analysis: env::var("DATE_ANALYSIS_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            },
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("AI_TIMEOUT_SECS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
