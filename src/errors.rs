//! Top-level error enum (§7): folds every component's typed error into one
//! public type via `#[from]`. Only config/URL-validation and pool errors
//! ever propagate past `run()` — everything else becomes a terminal
//! `AgentResult` instead (§7 "Propagation policy").

use auspex_core_types::{ActionValidationError, ConfigValidationError, UrlValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    #[error(transparent)]
    UrlValidation(#[from] UrlValidationError),

    #[error(transparent)]
    ActionValidation(#[from] ActionValidationError),

    #[error(transparent)]
    Pool(#[from] auspex_browser_pool::PoolError),

    #[error("browser driver error: {0}")]
    Driver(#[from] auspex_cdp_adapter::AdapterError),
}
