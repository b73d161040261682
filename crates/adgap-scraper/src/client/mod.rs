//! HTTP client for the ad library's `ads_archive` endpoint.

mod fetch_all;

use std::time::Duration;

use adgap_core::CompetitorEntity;
use chrono::NaiveDate;
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{AdArchivePage, ApiErrorEnvelope};

/// Maximum number of pages to fetch for one brand before giving up.
/// Guards against cursors that never terminate.
pub(super) const MAX_PAGES: usize = 50;

/// Largest page size the archive accepts.
pub(super) const PAGE_LIMIT: usize = 100;

const AD_FIELDS: &str = "id,page_name,ad_creative_bodies,ad_creative_link_titles,\
ad_snapshot_url,image_url,video_url,publisher_platforms,ad_delivery_start_time";

/// How a brand is looked up in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveQuery {
    PageId(String),
    SearchTerms(String),
}

impl ArchiveQuery {
    #[must_use]
    pub fn for_brand(brand: &CompetitorEntity) -> Self {
        match brand.page_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => ArchiveQuery::PageId(id.to_string()),
            _ => ArchiveQuery::SearchTerms(brand.search_key().to_string()),
        }
    }

    fn describe(&self) -> &str {
        match self {
            ArchiveQuery::PageId(id) | ArchiveQuery::SearchTerms(id) => id,
        }
    }
}

/// HTTP client for the ad library.
///
/// Rate limiting (429), 5xx responses and network failures are retried with
/// exponential backoff up to `max_retries` additional attempts. Other 4xx
/// responses surface as [`ScraperError::Api`] without retrying.
pub struct AdLibraryClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) access_token: Option<String>,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
}

impl AdLibraryClient {
    /// Creates a client with configured timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        access_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.map(str::to_owned),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of ads delivered on or after `since`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::Api`]: 4xx rejection (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`]: body is not a valid archive page.
    pub async fn fetch_ads_page(
        &self,
        query: &ArchiveQuery,
        since: NaiveDate,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<AdArchivePage, ScraperError> {
        let url = self.page_url(query, since, limit, cursor);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited { retry_after_secs });
                }

                if status.is_client_error() {
                    let body = response.text().await.unwrap_or_default();
                    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                        .map(|e| e.error.message)
                        .unwrap_or(body);
                    return Err(ScraperError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: redact_token(&url),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<AdArchivePage>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("ads_archive page for {}", query.describe()),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    /// Builds the archive URL for one page.
    fn page_url(
        &self,
        query: &ArchiveQuery,
        since: NaiveDate,
        limit: usize,
        cursor: Option<&str>,
    ) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
            match query {
                ArchiveQuery::PageId(id) => pairs.append_pair("search_page_ids", id),
                ArchiveQuery::SearchTerms(terms) => pairs.append_pair("search_terms", terms),
            };
            pairs
                .append_pair("ad_delivery_date_min", &since.format("%Y-%m-%d").to_string())
                .append_pair("fields", AD_FIELDS)
                .append_pair("limit", &limit.to_string());
            if let Some(after) = cursor {
                pairs.append_pair("after", after);
            }
        }
        url
    }
}

/// Strip the access token before a URL lands in an error or log line.
fn redact_token(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "access_token")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
