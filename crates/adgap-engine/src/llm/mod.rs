//! Generative-text backed classification and recommendation services.

mod anthropic;

use std::sync::Arc;

use adgap_core::AdCreative;
use async_trait::async_trait;

pub use anthropic::AnthropicClient;

use crate::decode::{decode_classification_items, decode_recommendations};
use crate::error::EngineError;
use crate::prompt::{
    build_classification_prompt, classification_system_prompt, RECOMMENDATION_SYSTEM_PROMPT,
};
use crate::services::{
    ClassificationItem, ClassificationService, RecommendationResponse, RecommendationService,
};

/// One system + user prompt in, one text completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, EngineError>;
}

pub struct LlmClassificationService {
    generator: Arc<dyn TextGenerator>,
    system_prompt: String,
    text_prefix_chars: usize,
}

impl LlmClassificationService {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, text_prefix_chars: usize) -> Self {
        Self {
            generator,
            system_prompt: classification_system_prompt(),
            text_prefix_chars,
        }
    }
}

#[async_trait]
impl ClassificationService for LlmClassificationService {
    async fn classify_batch(
        &self,
        batch: &[AdCreative],
    ) -> Result<Vec<ClassificationItem>, EngineError> {
        let prompt = build_classification_prompt(batch, self.text_prefix_chars);
        let text = self.generator.generate(&self.system_prompt, &prompt).await?;
        decode_classification_items(&text)
    }
}

pub struct LlmRecommendationService {
    generator: Arc<dyn TextGenerator>,
}

impl LlmRecommendationService {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl RecommendationService for LlmRecommendationService {
    async fn recommend(&self, prompt: &str) -> Result<RecommendationResponse, EngineError> {
        let text = self
            .generator
            .generate(RECOMMENDATION_SYSTEM_PROMPT, prompt)
            .await?;
        decode_recommendations(&text)
    }
}
