use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("base URL could not be parsed: {0}")]
    InvalidBaseUrl(String),
    #[error("markdown conversion failed: {0}")]
    Markdown(String),
}
