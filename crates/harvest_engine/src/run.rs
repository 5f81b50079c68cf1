use std::time::Duration;

use harvest_core::{Completion, PageOutcome, PageRange};
use harvest_logging::{harvest_info, harvest_warn};

use crate::fetch::PageFetcher;
use crate::retry::RetryPolicy;
use crate::sink::{CsvSink, SinkError};

/// What a finished run looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages committed to the sink.
    pub pages: u64,
    /// Records committed to the sink.
    pub records: u64,
    pub completion: Completion,
    /// First index of the page that was not ingested. A later run can be
    /// configured to resume from here.
    pub next_start: u64,
}

/// Drives pages forward from `initial_range` until the upstream reports end
/// of data or one page exhausts its retries.
///
/// Each successful page is committed to the sink before the cursor advances,
/// so interrupting the process at any point leaves every finished page on
/// disk. Only sink I/O errors propagate; fetch failures are absorbed by the
/// retry policy.
pub async fn run_harvest(
    fetcher: &dyn PageFetcher,
    policy: &RetryPolicy,
    sink: &CsvSink,
    initial_range: PageRange,
    page_delay: Duration,
) -> Result<RunSummary, SinkError> {
    let mut range = initial_range;
    let mut pages = 0u64;
    let mut records = 0u64;

    loop {
        harvest_info!("requesting rows {range}");
        match policy.attempt(fetcher, range).await {
            PageOutcome::Records(batch) => {
                sink.append(&batch)?;
                pages += 1;
                records += batch.len() as u64;
                harvest_info!("committed {} rows for {range}", batch.len());
                range = range.advance();
            }
            PageOutcome::Empty => {
                harvest_info!("no more rows upstream; harvest complete");
                return Ok(RunSummary {
                    pages,
                    records,
                    completion: Completion::EndOfData,
                    next_start: range.start(),
                });
            }
            PageOutcome::GiveUp => {
                harvest_warn!("giving up on rows {range}; keeping everything committed so far");
                return Ok(RunSummary {
                    pages,
                    records,
                    completion: Completion::GaveUp,
                    next_start: range.start(),
                });
            }
        }

        // Spacing between pages to respect upstream rate limits, separate
        // from the failure-retry delay.
        tokio::time::sleep(page_delay).await;
    }
}
