mod config;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use url::Url;

use harvest_core::{FieldSchema, PageRange};
use harvest_engine::{
    run_harvest, ApiEndpoint, CsvSink, FetchSettings, ReqwestPageFetcher, RetryPolicy,
};
use harvest_logging::{harvest_info, harvest_warn};

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("harvest.ron"));
    let config = config::load_or_create(&config_path)?;

    if config.api_key.is_empty() {
        bail!(
            "no api_key set in {}; request one from the open-data portal and fill it in",
            config_path.display()
        );
    }
    let initial_range = PageRange::new(config.start_index, config.end_index)
        .context("start_index must be >= 1 and end_index >= start_index")?;
    if config.fields.is_empty() {
        bail!("fields must name at least one source field");
    }

    let base = Url::parse(&config.base_url)
        .with_context(|| format!("invalid base_url {}", config.base_url))?;
    let endpoint = ApiEndpoint::new(base, &config.api_key, &config.service_id)?;
    let schema = FieldSchema::new(config.fields.clone());
    let sink = CsvSink::create(&config.output_path, &schema)?;
    let fetcher = ReqwestPageFetcher::new(FetchSettings::default(), endpoint, schema)?;
    let policy = RetryPolicy {
        max_retries: config.max_retries,
        retry_delay: Duration::from_secs(config.retry_delay_secs),
    };

    harvest_info!(
        "harvesting {} from index {} in windows of {}",
        config.service_id,
        initial_range.start(),
        initial_range.window_size()
    );

    // The total row count is only discoverable by probing, so pages run
    // strictly one at a time on a single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start async runtime")?;
    let summary = runtime.block_on(run_harvest(
        &fetcher,
        &policy,
        &sink,
        initial_range,
        Duration::from_secs(config.page_delay_secs),
    ))?;

    if summary.completion.completed_normally() {
        harvest_info!(
            "harvest complete: {} rows over {} pages written to {}",
            summary.records,
            summary.pages,
            config.output_path
        );
    } else {
        harvest_warn!(
            "harvest stopped early after {} pages ({} rows); resume from index {}",
            summary.pages,
            summary.records,
            summary.next_start
        );
    }
    Ok(())
}
