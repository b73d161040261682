//! Concrete collaborators backing the engine's service traits.

use adgap_core::{AdCreative, AnalysisResult, CompetitorEntity};
use adgap_engine::{AdLink, AdSource, AnalysisStore, EngineError};
use adgap_scraper::AdLibraryClient;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Retrieval through the ad-library HTTP API.
pub(crate) struct AdLibrarySource {
    client: AdLibraryClient,
    inter_request_delay_ms: u64,
}

impl AdLibrarySource {
    pub(crate) fn new(client: AdLibraryClient, inter_request_delay_ms: u64) -> Self {
        Self {
            client,
            inter_request_delay_ms,
        }
    }
}

#[async_trait]
impl AdSource for AdLibrarySource {
    async fn retrieve(
        &self,
        brand: &CompetitorEntity,
        max_ads: usize,
        days_back: u32,
    ) -> Result<Vec<AdCreative>, EngineError> {
        self.client
            .fetch_recent_ads(brand, max_ads, days_back, self.inter_request_delay_ms)
            .await
            .map_err(|e| EngineError::Retrieval {
                brand: brand.name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Analysis storage in the `gap_analyses` tables.
pub(crate) struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(e: adgap_db::DbError) -> EngineError {
    EngineError::Persistence(e.to_string())
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn store(&self, result: &AnalysisResult) -> Result<Uuid, EngineError> {
        adgap_db::insert_gap_analysis(&self.pool, result)
            .await
            .map_err(persistence)?;
        Ok(result.analysis_id)
    }

    async fn link_ad(&self, analysis_id: Uuid, link: &AdLink<'_>) -> Result<(), EngineError> {
        let ad = adgap_db::NewAnalysisAd {
            brand_name: link.brand_name,
            is_subject: link.is_subject,
            creative: link.creative,
            classification: link.classification,
        };
        adgap_db::insert_analysis_ad(&self.pool, analysis_id, ad)
            .await
            .map_err(persistence)
    }

    async fn fetch(&self, analysis_id: Uuid) -> Result<Option<AnalysisResult>, EngineError> {
        let Some(row) = adgap_db::get_gap_analysis_by_public_id(&self.pool, analysis_id)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };
        row.decode_result().map(Some).map_err(persistence)
    }
}
