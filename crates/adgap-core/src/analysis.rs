//! Outputs of one gap-analysis run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::{HookType, Tone};
use crate::creative::AdFormat;
use crate::profile::BrandProfile;
use crate::COMPETITOR_COUNT;

/// Patterns a consensus of competitors uses that the subject does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSet {
    pub missing_hooks: Vec<HookType>,
    pub underutilized_formats: Vec<AdFormat>,
    /// Competitors running more ads than the subject.
    pub winning_competitors: Vec<String>,
    pub missing_ctas: Vec<String>,
    pub missing_trust_signals: Vec<String>,
    pub competitor_offers: Vec<String>,
    pub tone_gaps: Vec<String>,
}

impl GapSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing_hooks.is_empty()
            && self.underutilized_formats.is_empty()
            && self.winning_competitors.is_empty()
            && self.missing_ctas.is_empty()
            && self.missing_trust_signals.is_empty()
            && self.competitor_offers.is_empty()
            && self.tone_gaps.is_empty()
    }
}

/// Plurality snapshot across the competitor profiles. Dimensions with no
/// competitor data are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    pub dominant_hook_type: Option<HookType>,
    pub dominant_format: Option<AdFormat>,
    pub dominant_tone: Option<Tone>,
    pub average_competitor_ad_count: u32,
    pub most_common_cta: Option<String>,
    pub most_common_trust_signal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" | "med" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub example: String,
    pub implementation: String,
}

/// Root aggregate of one analysis run. Built once, persisted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub subject: BrandProfile,
    pub competitors: [BrandProfile; COMPETITOR_COUNT],
    pub gaps: GapSet,
    pub recommendations: Vec<Recommendation>,
    pub market_insights: MarketInsights,
    /// Explanation returned alongside the recommendations.
    pub narrative: String,
    /// Quality signals raised while the run degraded but completed.
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parse_accepts_case_variants() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn priority_orders_high_first() {
        let mut p = vec![Priority::Low, Priority::High, Priority::Medium];
        p.sort();
        assert_eq!(p, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn empty_gap_set_reports_empty() {
        assert!(GapSet::default().is_empty());
        let gaps = GapSet {
            competitor_offers: vec!["20% off".to_string()],
            ..GapSet::default()
        };
        assert!(!gaps.is_empty());
    }

    #[test]
    fn analysis_result_round_trips_through_json() {
        let result = AnalysisResult {
            analysis_id: Uuid::new_v4(),
            created_at: Utc::now(),
            subject: BrandProfile::empty("Subject"),
            competitors: std::array::from_fn(|i| BrandProfile::empty(&format!("C{i}"))),
            gaps: GapSet::default(),
            recommendations: vec![Recommendation {
                priority: Priority::High,
                action: "Run a social proof campaign".to_string(),
                example: "\"Rated 4.9 by 2,000 homeowners\"".to_string(),
                implementation: "Collect reviews and rotate them weekly".to_string(),
            }],
            market_insights: MarketInsights {
                dominant_hook_type: None,
                dominant_format: None,
                dominant_tone: None,
                average_competitor_ad_count: 0,
                most_common_cta: None,
                most_common_trust_signal: None,
            },
            narrative: String::new(),
            warnings: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["competitors"].as_array().unwrap().len(), 5);
        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
