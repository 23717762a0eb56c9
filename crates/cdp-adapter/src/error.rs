use thiserror::Error;

/// Errors surfaced by the Chromium driver. The action executor and browser
/// pool match on these to decide whether a page is still usable.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to launch chromium: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("timed out waiting for '{0}'")]
    Timeout(String),
    #[error("element not found for selector '{0}'")]
    ElementNotFound(String),
    #[error("script evaluation failed: {0}")]
    Evaluate(String),
    #[error("cdp command failed: {0}")]
    Cdp(String),
    #[error("browser disconnected")]
    Disconnected,
}

impl AdapterError {
    /// Whether the underlying page/browser connection is assumed dead — the
    /// browser pool discards rather than recycles a page that fails this.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdapterError::Disconnected | AdapterError::Launch(_))
    }
}
