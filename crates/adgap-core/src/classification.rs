//! Per-ad classification across the eleven marketing dimensions.

use serde::{Deserialize, Serialize};

use crate::creative::AdCreative;

/// Characters of body text used for a headline when the creative has no title.
const FALLBACK_HEADLINE_CHARS: usize = 60;

/// CTA label recorded when the classifier could not determine one.
pub const UNKNOWN_CTA: &str = "Unknown";

/// Attention-grabbing mechanism of an ad's opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HookType {
    #[serde(rename = "Discount/Urgency")]
    DiscountUrgency,
    #[serde(rename = "Social Proof")]
    SocialProof,
    #[serde(rename = "Fear of Loss")]
    FearOfLoss,
    #[serde(rename = "Problem-Agitate")]
    ProblemAgitate,
    #[serde(rename = "Curiosity Gap")]
    CuriosityGap,
    Authority,
    Transformation,
    Educational,
    Other,
}

impl HookType {
    pub const ALL: [HookType; 9] = [
        HookType::DiscountUrgency,
        HookType::SocialProof,
        HookType::FearOfLoss,
        HookType::ProblemAgitate,
        HookType::CuriosityGap,
        HookType::Authority,
        HookType::Transformation,
        HookType::Educational,
        HookType::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HookType::DiscountUrgency => "Discount/Urgency",
            HookType::SocialProof => "Social Proof",
            HookType::FearOfLoss => "Fear of Loss",
            HookType::ProblemAgitate => "Problem-Agitate",
            HookType::CuriosityGap => "Curiosity Gap",
            HookType::Authority => "Authority",
            HookType::Transformation => "Transformation",
            HookType::Educational => "Educational",
            HookType::Other => "Other",
        }
    }

    /// Parse a label returned by the classification service.
    ///
    /// Matching ignores case, surrounding whitespace and separators, and accepts
    /// the two halves of `Discount/Urgency` on their own. Returns `None` for
    /// anything outside the closed set.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = compact(raw);
        match key.as_str() {
            "discounturgency" | "discount" | "urgency" => Some(HookType::DiscountUrgency),
            "socialproof" => Some(HookType::SocialProof),
            "fearofloss" => Some(HookType::FearOfLoss),
            "problemagitate" | "problemagitatesolve" => Some(HookType::ProblemAgitate),
            "curiositygap" | "curiosity" => Some(HookType::CuriosityGap),
            "authority" => Some(HookType::Authority),
            "transformation" => Some(HookType::Transformation),
            "educational" => Some(HookType::Educational),
            "other" => Some(HookType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall voice of the ad copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Urgent,
    Friendly,
    #[serde(rename = "Fear-based")]
    FearBased,
    Inspirational,
    Educational,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Urgent,
        Tone::Friendly,
        Tone::FearBased,
        Tone::Inspirational,
        Tone::Educational,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Urgent => "Urgent",
            Tone::Friendly => "Friendly",
            Tone::FearBased => "Fear-based",
            Tone::Inspirational => "Inspirational",
            Tone::Educational => "Educational",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "professional" => Some(Tone::Professional),
            "urgent" => Some(Tone::Urgent),
            "friendly" => Some(Tone::Friendly),
            "fearbased" | "fear" => Some(Tone::FearBased),
            "inspirational" => Some(Tone::Inspirational),
            "educational" => Some(Tone::Educational),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Length bucket of the ad body copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdLength {
    /// Fewer than 80 characters.
    Short,
    /// 80 to 250 characters inclusive.
    Medium,
    /// More than 250 characters.
    Long,
}

impl AdLength {
    /// Bucket derived from the character count of `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match text.chars().count() {
            n if n < 80 => AdLength::Short,
            n if n <= 250 => AdLength::Medium,
            _ => AdLength::Long,
        }
    }

    /// Accepts only the exact three bucket names, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "short" => Some(AdLength::Short),
            "medium" => Some(AdLength::Medium),
            "long" => Some(AdLength::Long),
            _ => None,
        }
    }
}

/// Structured classification of one creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdClassification {
    pub hook_type: HookType,
    /// Core value proposition in a few words.
    pub headline: String,
    /// Free-form call-to-action label, e.g. `Free Quote`.
    pub cta: String,
    pub offer: Option<String>,
    pub pain_point: Option<String>,
    pub audience_signals: Vec<String>,
    pub tone: Tone,
    pub ad_length: AdLength,
    pub trust_signals: Vec<String>,
    pub unique_selling_point: Option<String>,
}

impl AdClassification {
    /// Deterministic classification used when the classification service
    /// failed or skipped this creative.
    #[must_use]
    pub fn fallback(creative: &AdCreative) -> Self {
        let headline = match creative.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => creative
                .text
                .trim()
                .chars()
                .take(FALLBACK_HEADLINE_CHARS)
                .collect(),
        };

        Self {
            hook_type: HookType::Other,
            headline,
            cta: UNKNOWN_CTA.to_string(),
            offer: None,
            pain_point: None,
            audience_signals: Vec::new(),
            tone: Tone::Professional,
            ad_length: AdLength::from_text(&creative.text),
            trust_signals: Vec::new(),
            unique_selling_point: None,
        }
    }
}

/// Lowercase alphanumerics only, so `Fear-based`, `fear based` and
/// `FEAR_BASED` compare equal.
fn compact(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
