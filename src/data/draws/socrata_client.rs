// Std library crates
use std::fmt;
use std::time::Duration;

// External crates
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

// Local crates
use crate::config::SOCRATA;
use crate::utils::STANDARD_DATE_FORMAT;

/// One raw API row, exactly as the dataset serves it. A single row carries
/// both sessions for a date; either result may be missing or unpadded.
/// The dataset has shipped under two column spellings over the years.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub draw_date: String,
    #[serde(alias = "midday_win4")]
    pub midday_win_4: Option<String>,
    #[serde(alias = "evening_win4")]
    pub evening_win_4: Option<String>,
}

/// Dataset metadata from the views endpoint; feeds the freshness indicator
/// and the pagination total estimate. Timestamps are epoch seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetMetadata {
    #[serde(rename = "dataUpdatedAt")]
    pub data_updated_at: Option<i64>,
    #[serde(rename = "rowsUpdatedAt")]
    pub rows_updated_at: Option<i64>,
    #[serde(rename = "rowCount")]
    pub row_count: Option<usize>,
}

/// Errors surfaced by the fetch client. Transient variants are retried with
/// exponential backoff; the rest fail the page immediately.
#[derive(Debug)]
pub enum FetchError {
    /// Non-success HTTP status with a body excerpt
    Status { status: u16, body: String },
    /// Connection-level failure before a status was obtained
    Network(String),
    /// Response arrived but was not the JSON shape we expect
    Decode(String),
    /// Retry budget exhausted; carries the last underlying cause
    RetriesExhausted { attempts: u32, last: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => is_transient_status(*status),
            FetchError::Decode(_) | FetchError::RetriesExhausted { .. } => false,
        }
    }
}

/// Rate limiting and server-side failures are worth another attempt;
/// any other client error means the request itself is wrong.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Decode(msg) => write!(f, "unexpected response shape: {}", msg),
            FetchError::RetriesExhausted { attempts, last } => {
                write!(f, "failed after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Progress observer invoked after each fetched page. A plain `Fn`, so it
/// cannot abort the fetch; the total is `None` when no estimate is known.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, Option<usize>) + Send + Sync);

/// Anything that can serve offset/limit pages of raw records. The HTTP
/// client implements this; tests drive the pagination loop with a stub.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page(&self, offset: usize, limit: usize) -> Result<Vec<RawRecord>, FetchError>;
}

/// Pagination driver: request `page_size` records at a time until a short
/// (or empty) page signals the end of the data.
pub async fn fetch_all_pages(
    source: &dyn PageSource,
    page_size: usize,
    estimated_total: Option<usize>,
    progress: Option<ProgressFn<'_>>,
) -> Result<Vec<RawRecord>, FetchError> {
    let mut all_records = Vec::new();
    let mut offset = 0;

    loop {
        let page = source.page(offset, page_size).await?;
        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        all_records.extend(page);
        offset += page_len;

        if let Some(callback) = progress {
            callback(all_records.len(), estimated_total);
        }

        // A short page means we've reached the end of the dataset
        if page_len < page_size {
            break;
        }
    }

    Ok(all_records)
}

/// Client for the Socrata Open Data API.
pub struct SocrataClient {
    http: reqwest::Client,
    base_url: String,
    metadata_url: String,
    app_token: Option<String>,
}

impl SocrataClient {
    /// Build a client from the `SOCRATA` config. The app token is read from
    /// the environment; its absence only means the throttled anonymous tier.
    pub fn from_config() -> Result<Self> {
        let app_token = std::env::var(SOCRATA.dataset.token_env_var)
            .ok()
            .filter(|token| !token.is_empty());
        if app_token.is_none() {
            log::info!(
                "No {} set; using the anonymous rate-limit tier",
                SOCRATA.dataset.token_env_var
            );
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(SOCRATA.limits.timeout_ms))
            .build()?;

        Ok(SocrataClient {
            http,
            base_url: format!(
                "https://{}/resource/{}.json",
                SOCRATA.dataset.domain, SOCRATA.dataset.dataset_id
            ),
            metadata_url: format!(
                "https://{}/api/views/{}.json",
                SOCRATA.dataset.domain, SOCRATA.dataset.dataset_id
            ),
            app_token,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let mut request = self.http.get(url).query(params);
        if let Some(token) = &self.app_token {
            request = request.header("X-App-Token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// One request with the page retry policy: transient failures back off
    /// exponentially; anything else fails fast with the underlying cause.
    async fn get_json_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let max_retries = SOCRATA.limits.max_retries;
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..max_retries {
            if attempt > 0 {
                let backoff =
                    Duration::from_millis(SOCRATA.limits.retry_backoff_ms << (attempt - 1));
                log::info!(
                    "Retrying request (attempt {} of {}) after {:?}",
                    attempt + 1,
                    max_retries,
                    backoff
                );
                sleep(backoff).await;
            }

            match self.get_json(url, params).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    log::warn!("Transient fetch failure: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: max_retries,
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }

    fn page_params(offset: usize, limit: usize, where_clause: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("$limit", limit.to_string()),
            ("$offset", offset.to_string()),
            ("$order", "draw_date DESC".to_string()),
        ];
        if let Some(clause) = where_clause {
            params.push(("$where", clause.to_string()));
        }
        params
    }

    /// Dataset metadata: update timestamps and row count. Same retry policy
    /// as the data pages.
    pub async fn fetch_metadata(&self) -> Result<DatasetMetadata, FetchError> {
        self.get_json_with_retry(&self.metadata_url, &[]).await
    }

    /// Fetch the complete draw table, page by page. The row-count estimate
    /// from metadata (or the configured fallback) is only used for progress
    /// reporting, never for termination.
    pub async fn fetch_all(
        &self,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let estimated_total = match self.fetch_metadata().await {
            Ok(metadata) => metadata.row_count,
            Err(e) => {
                log::warn!("Metadata unavailable ({}); using fallback row estimate", e);
                Some(SOCRATA.limits.fallback_row_estimate)
            }
        };

        fetch_all_pages(self, SOCRATA.limits.page_size, estimated_total, progress).await
    }

    /// Fetch only the most recent `days` of records via a server-side date
    /// filter; cheaper than a full pull for quick refreshes.
    pub async fn fetch_recent(
        &self,
        days: u32,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let cutoff = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(u64::from(days)))
            .map(|d| d.format(STANDARD_DATE_FORMAT).to_string())
            .unwrap_or_default();
        let recent = RecentPages {
            client: self,
            where_clause: format!("draw_date >= '{}'", cutoff),
        };

        // Two drawings per day is a good enough estimate for progress
        let estimated_total = Some(days as usize * 2);
        fetch_all_pages(&recent, SOCRATA.limits.page_size, estimated_total, progress).await
    }
}

#[async_trait]
impl PageSource for SocrataClient {
    async fn page(&self, offset: usize, limit: usize) -> Result<Vec<RawRecord>, FetchError> {
        let params = Self::page_params(offset, limit, None);
        self.get_json_with_retry(&self.base_url, &params).await
    }
}

/// Page source restricted to recent rows via a `$where` predicate.
struct RecentPages<'a> {
    client: &'a SocrataClient,
    where_clause: String,
}

#[async_trait]
impl PageSource for RecentPages<'_> {
    async fn page(&self, offset: usize, limit: usize) -> Result<Vec<RawRecord>, FetchError> {
        let params = SocrataClient::page_params(offset, limit, Some(&self.where_clause));
        self.client
            .get_json_with_retry(&self.client.base_url, &params)
            .await
    }
}
