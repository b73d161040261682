use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by ad library (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("ad library rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("normalization error for ad {ad_id}: {reason}")]
    Normalization { ad_id: String, reason: String },

    #[error("pagination limit reached for {query}: exceeded {max_pages} pages")]
    PaginationLimit { query: String, max_pages: usize },

    #[error("invalid ad library URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
