//! Competitive gap-analysis engine.
//!
//! Compares one subject brand's recent ad creatives against five competitors:
//! classifies every creative, folds each brand into a statistical profile,
//! derives consensus gaps and market-wide dominant patterns, and asks a
//! generative text service for ranked recommendations. Collaborators
//! (retrieval, classification, recommendation, persistence) sit behind the
//! traits in [`services`].

pub mod aggregate;
pub mod classifier;
pub mod decode;
pub mod error;
pub mod gaps;
pub mod llm;
pub mod market;
pub mod pipeline;
pub mod prompt;
pub mod recommendations;
pub mod services;

pub use aggregate::aggregate;
pub use classifier::{ClassificationOutcome, Classifier};
pub use error::EngineError;
pub use gaps::compute_gaps;
pub use llm::{AnthropicClient, LlmClassificationService, LlmRecommendationService, TextGenerator};
pub use market::{dominant, synthesize};
pub use pipeline::{validate_competitor_set, Orchestrator};
pub use services::{
    AdLink, AdSource, AnalysisStore, ClassificationItem, ClassificationService, RawRecommendation,
    RecommendationResponse, RecommendationService,
};
