//! Shared data model and configuration for the ad gap-analysis engine.

pub mod analysis;
pub mod app_config;
pub mod classification;
pub mod competitors;
pub mod config;
pub mod creative;
pub mod profile;

use thiserror::Error;

pub use analysis::{AnalysisResult, GapSet, MarketInsights, Priority, Recommendation};
pub use app_config::{AnalysisConfig, AppConfig, Environment};
pub use classification::{AdClassification, AdLength, HookType, Tone};
pub use competitors::{load_competitor_set, CompetitorEntity, CompetitorSetFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use creative::{AdCreative, AdFormat};
pub use profile::{normalize_label, push_unique, AdLengthDistribution, BrandProfile, FormatDistribution};

/// Number of competitor brands every analysis compares the subject against.
pub const COMPETITOR_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read competitor set {path}: {source}")]
    CompetitorFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse competitor set: {0}")]
    CompetitorFileParse(#[source] serde_yaml::Error),

    #[error("competitor set validation failed: {0}")]
    Validation(String),
}
