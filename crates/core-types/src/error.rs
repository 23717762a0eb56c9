//! Domain-level error kinds (§7). These are the typed errors the individual
//! components (C1, C2, C6...) return; the root crate's `errors` module
//! folds them into a single public error enum with `#[from]`.

use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("invalid configuration: {0}")]
pub struct ConfigValidationError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("URL rejected: {0}")]
pub struct UrlValidationError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("invalid action: {0}")]
pub struct ActionValidationError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("transient LLM error: {0}")]
pub struct LlmTransientError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("LLM call failed: {0}")]
pub struct LlmFatalError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("blocked by target site: {0}")]
pub struct BlockedError(pub String);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("browser pool error: {0}")]
pub struct PoolError(pub String);
