use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskPulseError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown prompt template type: {0}")]
    UnknownTemplate(String),

    #[error("Missing template variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
