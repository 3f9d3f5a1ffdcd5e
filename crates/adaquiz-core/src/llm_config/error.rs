use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Unknown llm provider: {0}")]
    UnknownProvider(String),
}
