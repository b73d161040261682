//! Ad-library response types for the `ads_archive` endpoint.
//!
//! ### Creative text
//! Bodies and link titles arrive as **arrays of strings**, one per creative
//! variation. Only the first non-empty entry is used. Either array may be
//! missing entirely on image-only ads.
//!
//! ### Media
//! `video_url` is present only for video creatives. `image_url` and
//! `ad_snapshot_url` are both optional; the snapshot URL points at the
//! rendered ad and serves as the image reference when no direct image exists.
//!
//! ### Dates
//! `ad_delivery_start_time` is usually a bare date (`2025-03-14`) but some
//! records carry a full RFC 3339 timestamp.

use serde::Deserialize;

/// One page of `GET /ads_archive`.
#[derive(Debug, Deserialize)]
pub struct AdArchivePage {
    #[serde(default)]
    pub data: Vec<ArchivedAd>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl AdArchivePage {
    /// Cursor for the next page, if the library reports one.
    ///
    /// A cursor without a `next` link means the last page was reached.
    #[must_use]
    pub fn next_cursor(&self) -> Option<String> {
        let paging = self.paging.as_ref()?;
        paging.next.as_ref()?;
        paging
            .cursors
            .as_ref()
            .and_then(|c| c.after.clone())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

/// A single archived ad.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedAd {
    pub id: String,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub ad_creative_bodies: Vec<String>,
    #[serde(default)]
    pub ad_creative_link_titles: Vec<String>,
    #[serde(default)]
    pub ad_snapshot_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub publisher_platforms: Vec<String>,
    #[serde(default)]
    pub ad_delivery_start_time: Option<String>,
}

/// Error envelope returned with 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
