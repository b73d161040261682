//! Per-brand statistical profile produced by the aggregator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classification::{AdLength, HookType, Tone};
use crate::creative::AdFormat;

/// Distributions and deduplicated lists summarizing one brand's creatives.
///
/// Every distribution sums to `ad_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub name: String,
    pub ad_count: u32,
    pub hook_distribution: BTreeMap<HookType, u32>,
    pub format_distribution: FormatDistribution,
    pub cta_distribution: BTreeMap<String, u32>,
    pub tone_distribution: BTreeMap<Tone, u32>,
    pub ad_length_distribution: AdLengthDistribution,
    pub offers_used: Vec<String>,
    pub trust_signals_used: Vec<String>,
    pub pain_points_addressed: Vec<String>,
    pub usps: Vec<String>,
}

impl BrandProfile {
    /// Profile for a brand with no creatives.
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ad_count: 0,
            hook_distribution: BTreeMap::new(),
            format_distribution: FormatDistribution::default(),
            cta_distribution: BTreeMap::new(),
            tone_distribution: BTreeMap::new(),
            ad_length_distribution: AdLengthDistribution::default(),
            offers_used: Vec::new(),
            trust_signals_used: Vec::new(),
            pain_points_addressed: Vec::new(),
            usps: Vec::new(),
        }
    }

    #[must_use]
    pub fn hook_count(&self, hook: HookType) -> u32 {
        self.hook_distribution.get(&hook).copied().unwrap_or(0)
    }

    /// Fraction of this brand's ads in `format`, or `0.0` with no ads.
    #[must_use]
    pub fn format_share(&self, format: AdFormat) -> f64 {
        if self.ad_count == 0 {
            return 0.0;
        }
        f64::from(self.format_distribution.get(format)) / f64::from(self.ad_count)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDistribution {
    pub video: u32,
    pub image: u32,
    pub ugc_video: u32,
    pub carousel: u32,
}

impl FormatDistribution {
    #[must_use]
    pub fn get(&self, format: AdFormat) -> u32 {
        match format {
            AdFormat::Video => self.video,
            AdFormat::Image => self.image,
            AdFormat::UgcVideo => self.ugc_video,
            AdFormat::Carousel => self.carousel,
        }
    }

    pub fn increment(&mut self, format: AdFormat) {
        let slot = match format {
            AdFormat::Video => &mut self.video,
            AdFormat::Image => &mut self.image,
            AdFormat::UgcVideo => &mut self.ugc_video,
            AdFormat::Carousel => &mut self.carousel,
        };
        *slot += 1;
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.video + self.image + self.ugc_video + self.carousel
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdLengthDistribution {
    pub short: u32,
    pub medium: u32,
    pub long: u32,
}

impl AdLengthDistribution {
    pub fn increment(&mut self, length: AdLength) {
        match length {
            AdLength::Short => self.short += 1,
            AdLength::Medium => self.medium += 1,
            AdLength::Long => self.long += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.short + self.medium + self.long
    }
}

/// Comparison key for free-form labels: trimmed and lowercased.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Append `value` (trimmed) unless it is empty or already present under
/// [`normalize_label`] equality. Returns `true` if it was appended.
pub fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let key = normalize_label(trimmed);
    if list.iter().any(|existing| normalize_label(existing) == key) {
        return false;
    }
    list.push(trimmed.to_string());
    true
}
