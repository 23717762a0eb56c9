use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmClientError {
    #[error("transient LLM error: {0}")]
    Transient(String),
    #[error("LLM call failed: {0}")]
    Fatal(String),
}
