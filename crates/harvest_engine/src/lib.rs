//! Harvest engine: HTTP paging, retry policy, ingestion loop and CSV sink.
mod fetch;
mod retry;
mod run;
mod sink;

pub use fetch::{
    ApiEndpoint, EndpointError, FetchInitError, FetchSettings, PageFetcher, ReqwestPageFetcher,
};
pub use retry::RetryPolicy;
pub use run::{run_harvest, RunSummary};
pub use sink::{CsvSink, SinkError};
