//! Boundaries to the external collaborators the engine drives.

use adgap_core::{AdClassification, AdCreative, AnalysisResult, CompetitorEntity};
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineError;

/// Retrieves a brand's recent creatives.
#[async_trait]
pub trait AdSource: Send + Sync {
    async fn retrieve(
        &self,
        brand: &CompetitorEntity,
        max_ads: usize,
        days_back: u32,
    ) -> Result<Vec<AdCreative>, EngineError>;
}

/// Classifies one batch of creatives.
///
/// Items reference creatives by their position in `batch`. An unparsable
/// response must be reported as an error for the whole batch.
#[async_trait]
pub trait ClassificationService: Send + Sync {
    async fn classify_batch(
        &self,
        batch: &[AdCreative],
    ) -> Result<Vec<ClassificationItem>, EngineError>;
}

/// Turns a gap summary prompt into a narrative and ranked recommendations.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, prompt: &str) -> Result<RecommendationResponse, EngineError>;
}

/// Durable storage for finished analyses.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist `result`, returning its analysis id.
    async fn store(&self, result: &AnalysisResult) -> Result<Uuid, EngineError>;

    /// Record that one classified creative belongs to a stored analysis.
    async fn link_ad(&self, analysis_id: Uuid, link: &AdLink<'_>) -> Result<(), EngineError>;

    async fn fetch(&self, analysis_id: Uuid) -> Result<Option<AnalysisResult>, EngineError>;
}

/// Per-ad linkage written after the analysis result is stored.
#[derive(Debug, Clone, Copy)]
pub struct AdLink<'a> {
    pub brand_name: &'a str,
    pub is_subject: bool,
    pub creative: &'a AdCreative,
    pub classification: &'a AdClassification,
}

/// One loosely-typed item from a classification response.
///
/// Enum-valued fields stay as raw strings here; the classifier validates them
/// against the closed sets and falls back field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationItem {
    /// Position of the creative within the submitted batch.
    pub index: usize,
    pub hook_type: Option<String>,
    pub headline: Option<String>,
    pub cta: Option<String>,
    pub offer: Option<String>,
    pub pain_point: Option<String>,
    pub audience_signals: Vec<String>,
    pub tone: Option<String>,
    pub ad_length: Option<String>,
    pub trust_signals: Vec<String>,
    pub unique_selling_point: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationResponse {
    pub narrative: String,
    pub recommendations: Vec<RawRecommendation>,
}

/// Recommendation as returned by the service, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecommendation {
    pub priority: Option<String>,
    pub action: Option<String>,
    pub example: Option<String>,
    pub implementation: Option<String>,
}
