pub mod analyzer;
pub mod config;
pub mod error;
pub mod prompts;
pub mod template;
pub mod traits;
pub mod types;

pub use analyzer::OpenAiAnalyzer;
pub use config::{AnalysisModels, Config};
pub use error::TaskPulseError;
pub use prompts::{PromptRegistry, PromptType};
pub use template::{format_template, validate_template};
pub use traits::{LanguageAnalyzer, TaskRetriever};
pub use types::*;
