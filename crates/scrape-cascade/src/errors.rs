use thiserror::Error;

use crate::ScrapeTier;

/// A single tier's failure reason, kept so the cascade can report a
/// consolidated, multi-line error when every tier is exhausted (§4.9).
#[derive(Clone, Debug)]
pub struct TierFailure {
    pub tier: ScrapeTier,
    pub reason: String,
}

impl std::fmt::Display for TierFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.tier, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("URL rejected: {0}")]
    UrlRejected(String),
    #[error("{0}")]
    Tier(TierFailure),
}

/// Renders every tier's failure as the multi-line cause list a consolidated,
/// all-tiers-exhausted [`crate::ScrapeOutcome`] carries in place of content
/// (§4.9).
pub fn consolidated_message(failures: &[TierFailure]) -> String {
    failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("\n")
}
