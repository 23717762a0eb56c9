use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("browser pool is closed")]
    Closed,
    #[error("acquire timed out")]
    AcquireTimeout,
    #[error("failed to launch browser: {0}")]
    Launch(String),
}

impl From<PoolError> for auspex_core_types::PoolError {
    fn from(value: PoolError) -> Self {
        auspex_core_types::PoolError(value.to_string())
    }
}
