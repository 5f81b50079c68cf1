use std::time::Duration;

use thiserror::Error;
use url::Url;

use harvest_core::{classify_body, FetchOutcome, FieldSchema, PageRange, TransientReason};
use harvest_logging::harvest_debug;

/// The upstream only speaks JSON for this harvester.
const DATA_TYPE: &str = "json";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("base url cannot carry path segments: {0}")]
    CannotBeABase(Url),
}

#[derive(Debug, Error)]
pub enum FetchInitError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Identity of the upstream paging API: base URL, caller key and service id.
/// Request URLs have the shape `{base}/{key}/{service}/json/{start}/{end}`.
#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    base: Url,
    api_key: String,
    service_id: String,
}

impl ApiEndpoint {
    pub fn new(
        base: Url,
        api_key: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Result<Self, EndpointError> {
        if base.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(base));
        }
        Ok(Self {
            base,
            api_key: api_key.into(),
            service_id: service_id.into(),
        })
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    fn page_url(&self, range: PageRange) -> Url {
        let start = range.start().to_string();
        let end = range.end().to_string();
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("checked in ApiEndpoint::new");
            segments.pop_if_empty().extend([
                self.api_key.as_str(),
                self.service_id.as_str(),
                DATA_TYPE,
                start.as_str(),
                end.as_str(),
            ]);
        }
        url
    }
}

/// Issues one bounded-timeout request for an index window and classifies the
/// result. Implementations must not let transport or decode failures escape
/// as errors; everything becomes a [`FetchOutcome`].
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, range: PageRange) -> FetchOutcome;
}

pub struct ReqwestPageFetcher {
    client: reqwest::Client,
    endpoint: ApiEndpoint,
    schema: FieldSchema,
}

impl ReqwestPageFetcher {
    pub fn new(
        settings: FetchSettings,
        endpoint: ApiEndpoint,
        schema: FieldSchema,
    ) -> Result<Self, FetchInitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            schema,
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, range: PageRange) -> FetchOutcome {
        let url = self.endpoint.page_url(range);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                return FetchOutcome::TransientFailure(TransientReason::Network(err.to_string()))
            }
        };

        // The upstream serves maintenance pages and error text under assorted
        // status codes, so classification goes by body content only.
        harvest_debug!("rows {range}: http status {}", response.status());

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return FetchOutcome::TransientFailure(TransientReason::Network(err.to_string()))
            }
        };

        classify_body(&body, self.endpoint.service_id(), &self.schema)
    }
}
