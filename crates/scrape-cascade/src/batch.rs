//! `scrapeMany`: bounded concurrency over independent URLs, default 3, using
//! a wait-for-completion-then-refill pattern — one URL's failure never
//! aborts the batch (§5, SPEC_FULL.md §B).

use crate::{scrape, ScrapeError, ScrapeOptions, ScrapeOutcome};

pub const DEFAULT_BATCH_CONCURRENCY: usize = 3;

/// Scrapes every URL in `urls`, at most `concurrency` in flight at once.
/// Each batch of `concurrency` URLs is fully awaited before the next batch
/// starts; a failing URL's slot holds its `Err` rather than short-circuiting
/// the rest.
pub async fn scrape_many(
    urls: &[String],
    opts: &ScrapeOptions,
    concurrency: usize,
) -> Vec<Result<ScrapeOutcome, ScrapeError>> {
    let concurrency = concurrency.max(1);
    let mut results = Vec::with_capacity(urls.len());

    for batch in urls.chunks(concurrency) {
        let futures = batch.iter().map(|url| scrape(url, opts));
        let batch_results = futures::future::join_all(futures).await;
        results.extend(batch_results);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_concurrency_is_three() {
        assert_eq!(DEFAULT_BATCH_CONCURRENCY, 3);
    }
}
