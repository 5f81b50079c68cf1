use std::time::Duration;

use harvest_core::{FetchOutcome, PageOutcome, PageRange};
use harvest_logging::harvest_warn;

use crate::fetch::PageFetcher;

/// Bounded retries with a fixed delay between attempts.
///
/// `Records` and `Empty` are decisive and end retrying immediately.
/// Transient failures and malformed bodies both consume an attempt; the
/// upstream's decode failures are observed to be one-off corruption, not
/// structural, so they get the same treatment.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Fetches `range` until a decisive outcome or the attempt budget runs
    /// out. The budget is clamped to at least one attempt.
    pub async fn attempt(&self, fetcher: &dyn PageFetcher, range: PageRange) -> PageOutcome {
        let budget = self.max_retries.max(1);
        for attempt in 1..=budget {
            match fetcher.fetch(range).await {
                FetchOutcome::Records(records) => return PageOutcome::Records(records),
                FetchOutcome::Empty => return PageOutcome::Empty,
                FetchOutcome::TransientFailure(reason) => {
                    harvest_warn!("rows {range}, attempt {attempt}/{budget}: {reason}");
                }
                FetchOutcome::Malformed(message) => {
                    harvest_warn!("rows {range}, attempt {attempt}/{budget}: undecodable body: {message}");
                }
            }
            if attempt < budget {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        PageOutcome::GiveUp
    }
}
