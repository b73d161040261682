//! Normalization from raw [`ArchivedAd`] records to [`adgap_core::AdCreative`].

use adgap_core::AdCreative;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ScraperError;
use crate::types::ArchivedAd;

const DEFAULT_PLATFORM: &str = "facebook";

/// Normalizes a raw archived ad into an [`AdCreative`] attributed to `brand_name`.
///
/// The brand name comes from the caller rather than `page_name` so that every
/// creative of one brand aggregates under the same key.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the ad has neither body text nor
/// a link title, since there is nothing to classify.
pub fn normalize_ad(ad: ArchivedAd, brand_name: &str) -> Result<AdCreative, ScraperError> {
    let text = first_non_empty(&ad.ad_creative_bodies);
    let title = first_non_empty(&ad.ad_creative_link_titles);

    let text = match (text, &title) {
        (Some(text), _) => text,
        (None, Some(title)) => title.clone(),
        (None, None) => {
            return Err(ScraperError::Normalization {
                ad_id: ad.id,
                reason: "ad has no body text or link title".into(),
            })
        }
    };

    let video_ref = ad.video_url.filter(|s| !s.trim().is_empty());
    let image_ref = ad
        .image_url
        .filter(|s| !s.trim().is_empty())
        .or_else(|| ad.ad_snapshot_url.filter(|s| !s.trim().is_empty()));

    let platform = ad
        .publisher_platforms
        .iter()
        .map(|p| p.trim().to_lowercase())
        .find(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

    let started_at = ad
        .ad_delivery_start_time
        .as_deref()
        .and_then(parse_delivery_time);

    Ok(AdCreative {
        id: ad.id,
        brand_name: brand_name.to_string(),
        text,
        title,
        image_ref,
        video_ref,
        platform,
        started_at,
    })
}

fn first_non_empty(values: &[String]) -> Option<String> {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_delivery_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
