//! Database operations for the `gap_analyses` and `gap_analysis_ads` tables.

use adgap_core::{AdClassification, AdCreative, AnalysisResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A full row from the `gap_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GapAnalysisRow {
    pub id: i64,
    pub public_id: Uuid,
    pub subject_name: String,
    pub ad_count: i32,
    pub result: Value,
    pub created_at: DateTime<Utc>,
}

impl GapAnalysisRow {
    /// Deserialize the stored `result` column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the JSON no longer matches
    /// [`AnalysisResult`].
    pub fn decode_result(&self) -> Result<AnalysisResult, DbError> {
        Ok(serde_json::from_value(self.result.clone())?)
    }
}

/// `gap_analyses` without the result payload, for listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GapAnalysisSummaryRow {
    pub id: i64,
    pub public_id: Uuid,
    pub subject_name: String,
    pub ad_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A row from the `gap_analysis_ads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisAdRow {
    pub id: i64,
    pub analysis_id: i64,
    pub brand_name: String,
    pub is_subject: bool,
    pub creative_id: String,
    pub platform: String,
    pub ad_text: String,
    pub started_at: Option<DateTime<Utc>>,
    pub classification: Value,
    pub created_at: DateTime<Utc>,
}

/// Values for one `gap_analysis_ads` insert.
#[derive(Debug, Clone, Copy)]
pub struct NewAnalysisAd<'a> {
    pub brand_name: &'a str,
    pub is_subject: bool,
    pub creative: &'a AdCreative,
    pub classification: &'a AdClassification,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a finished analysis and return its internal id.
///
/// The whole result is stored as JSONB under its `analysis_id` as
/// `public_id`.
///
/// # Errors
///
/// Returns [`DbError::Serialization`] if the result cannot be encoded, or
/// [`DbError::Sqlx`] if the insert fails (including a duplicate `public_id`).
pub async fn insert_gap_analysis(pool: &PgPool, result: &AnalysisResult) -> Result<i64, DbError> {
    let payload = serde_json::to_value(result)?;
    let ad_count = i32::try_from(result.subject.ad_count).unwrap_or(i32::MAX);

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO gap_analyses (public_id, subject_name, ad_count, result, created_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(result.analysis_id)
    .bind(&result.subject.name)
    .bind(ad_count)
    .bind(payload)
    .bind(result.created_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Link one classified creative to the analysis identified by `public_id`.
///
/// Re-linking the same creative for the same brand and analysis is a no-op.
/// The same creative id may be linked once per brand.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no analysis has `public_id`,
/// [`DbError::Serialization`] if the classification cannot be encoded, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analysis_ad(
    pool: &PgPool,
    public_id: Uuid,
    ad: NewAnalysisAd<'_>,
) -> Result<(), DbError> {
    let classification = serde_json::to_value(ad.classification)?;

    let analysis_id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM gap_analyses WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(pool)
            .await?;
    let analysis_id = analysis_id.ok_or(DbError::NotFound)?;

    sqlx::query(
        "INSERT INTO gap_analysis_ads \
             (analysis_id, brand_name, is_subject, creative_id, platform, ad_text, \
              started_at, classification) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (analysis_id, brand_name, creative_id) DO NOTHING",
    )
    .bind(analysis_id)
    .bind(ad.brand_name)
    .bind(ad.is_subject)
    .bind(&ad.creative.id)
    .bind(&ad.creative.platform)
    .bind(&ad.creative.text)
    .bind(ad.creative.started_at)
    .bind(classification)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch one analysis by public UUID, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_gap_analysis_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<GapAnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, GapAnalysisRow>(
        "SELECT id, public_id, subject_name, ad_count, result, created_at \
         FROM gap_analyses \
         WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List recent analyses, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_gap_analyses(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<GapAnalysisSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, GapAnalysisSummaryRow>(
        "SELECT id, public_id, subject_name, ad_count, created_at \
         FROM gap_analyses \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List the ads linked to an analysis, subject ads first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_analysis_ads(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Vec<AnalysisAdRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisAdRow>(
        "SELECT a.id, a.analysis_id, a.brand_name, a.is_subject, a.creative_id, a.platform, \
                a.ad_text, a.started_at, a.classification, a.created_at \
         FROM gap_analysis_ads a \
         JOIN gap_analyses g ON g.id = a.analysis_id \
         WHERE g.public_id = $1 \
         ORDER BY a.is_subject DESC, a.brand_name, a.id",
    )
    .bind(public_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
