use std::collections::BTreeMap;

use log::{debug, error, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, DETAIL_PATH, LIST_PATH};
use crate::error::FetchError;
use crate::record::JobRecord;

pub const LIMIT_KEY: &str = "limit";
pub const PAGE_KEY: &str = "page";
pub const ORDER_BY_KEY: &str = "order_by";

/// Paging and filter parameters for one listing call.
///
/// Keys other than `limit`/`page` are passed through to the source verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchQuery {
    params: BTreeMap<String, String>,
}

impl FetchQuery {
    pub fn new() -> Self {
        FetchQuery::default()
    }

    pub fn limit(self, limit: usize) -> Self {
        self.param(LIMIT_KEY, limit.to_string())
    }

    pub fn page(self, page: usize) -> Self {
        self.param(PAGE_KEY, page.to_string())
    }

    pub fn order_by(self, key: impl Into<String>) -> Self {
        self.param(ORDER_BY_KEY, key)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn page_number(&self) -> Option<usize> {
        self.get(PAGE_KEY).and_then(|p| p.parse().ok())
    }

    pub fn page_size(&self) -> Option<usize> {
        self.get(LIMIT_KEY).and_then(|l| l.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Records on one page plus whether the caller should keep going.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<JobRecord>,
    pub more: bool,
}

impl Page {
    /// An empty page ends pagination whatever `more` says.
    pub fn has_more(&self) -> bool {
        self.more && !self.records.is_empty()
    }
}

/// One bounded round-trip against the listing endpoint.
pub trait PageFetcher {
    fn fetch(&self, query: &FetchQuery) -> Result<Page, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, query: &FetchQuery) -> Result<Page, FetchError> {
        (**self).fetch(query)
    }
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    results: Vec<Value>,
}

/// Decodes a listing body. Records that don't match the expected shape are
/// dropped one by one; only a body that isn't a listing at all fails the page.
pub fn decode_page(body: &str, query: &FetchQuery) -> Result<Page, FetchError> {
    let response: ListResponse = serde_json::from_str(body)?;

    let mut records = Vec::with_capacity(response.results.len());
    for raw in response.results {
        match serde_json::from_value::<JobRecord>(raw) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed job record: {}", e),
        }
    }

    let more = match (response.total, query.page_number(), query.page_size()) {
        (Some(total), Some(page), Some(limit)) => ((page * limit) as u64) < total,
        _ => true,
    };

    Ok(Page { records, more })
}

/// Blocking HTTP transport for the itjobs.pt API.
pub struct HttpPageFetcher {
    client: Client,
    api_key: String,
    list_url: Url,
    detail_url: Url,
}

impl HttpPageFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FetchError::Transport(format!("invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint_base(&config.base_url)?;
        let list_url = base
            .join(LIST_PATH)
            .map_err(|e| FetchError::InvalidEndpoint(e.to_string()))?;
        let detail_url = base
            .join(DETAIL_PATH)
            .map_err(|e| FetchError::InvalidEndpoint(e.to_string()))?;

        Ok(HttpPageFetcher {
            client,
            api_key: config.api_key.clone(),
            list_url,
            detail_url,
        })
    }

    fn get(&self, url: &Url, params: &[(&str, &str)]) -> Result<String, FetchError> {
        debug!("GET {} {:?}", url, params);
        let resp = self
            .client
            .get(url.clone())
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                FetchError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Listing service answered {} for {}", status, url);
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(resp.text()?)
    }

    /// Detail lookup for a single posting.
    pub fn fetch_job(&self, job_id: i64) -> Result<JobRecord, FetchError> {
        let id = job_id.to_string();
        let body = self.get(&self.detail_url, &[("id", id.as_str())])?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, query: &FetchQuery) -> Result<Page, FetchError> {
        let params: Vec<(&str, &str)> = query.iter().collect();
        let body = self.get(&self.list_url, &params)?;
        decode_page(&body, query)
    }
}

// Url::join drops the last path segment unless the base ends with '/'.
fn endpoint_base(base_url: &str) -> Result<Url, FetchError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Url::parse(&normalized).map_err(|e| FetchError::InvalidEndpoint(format!("{}: {}", base_url, e)))
}
