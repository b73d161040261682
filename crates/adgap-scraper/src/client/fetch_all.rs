//! Multi-page ad fetch loop for `AdLibraryClient`.

use std::time::Duration;

use adgap_core::{AdCreative, CompetitorEntity};
use chrono::{NaiveDate, Utc};

use crate::error::ScraperError;
use crate::normalize::normalize_ad;

use super::{AdLibraryClient, ArchiveQuery, MAX_PAGES, PAGE_LIMIT};

impl AdLibraryClient {
    /// Fetches up to `max_ads` creatives delivered within the last `days_back`
    /// days for `brand`.
    ///
    /// Follows archive cursors until enough ads are collected or no next page
    /// exists. Ads that cannot be normalized (no text at all) are skipped with
    /// a debug log. `inter_request_delay_ms` is slept between page requests.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_ads_page`]; already-fetched ads
    /// are discarded. Returns [`ScraperError::PaginationLimit`] after
    /// [`MAX_PAGES`] pages.
    pub async fn fetch_recent_ads(
        &self,
        brand: &CompetitorEntity,
        max_ads: usize,
        days_back: u32,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<AdCreative>, ScraperError> {
        let since = delivery_cutoff(Utc::now().date_naive(), days_back);
        let query = ArchiveQuery::for_brand(brand);

        let mut creatives: Vec<AdCreative> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        while creatives.len() < max_ads {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    query: query.describe().to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if page_count > 1 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let limit = (max_ads - creatives.len()).min(PAGE_LIMIT);
            let page = self
                .fetch_ads_page(&query, since, limit, cursor.as_deref())
                .await?;
            let next = page.next_cursor();

            for raw in page.data {
                match normalize_ad(raw, &brand.name) {
                    Ok(creative) => creatives.push(creative),
                    Err(e) => {
                        tracing::debug!(brand = %brand.name, error = %e, "skipping ad");
                    }
                }
            }

            cursor = next;
            if cursor.is_none() {
                break;
            }
        }

        creatives.truncate(max_ads);
        Ok(creatives)
    }
}

/// First delivery date included for a `days_back` window ending `today`.
pub(super) fn delivery_cutoff(today: NaiveDate, days_back: u32) -> NaiveDate {
    today
        .checked_sub_days(chrono::Days::new(u64::from(days_back)))
        .unwrap_or(NaiveDate::MIN)
}
