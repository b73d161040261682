//! Offline unit tests for adgap-db pool configuration and row types.
//! These tests do not require a live database connection.

use adgap_core::{
    AnalysisConfig, AnalysisResult, AppConfig, BrandProfile, Environment, GapSet, MarketInsights,
};
use adgap_db::{AnalysisAdRow, DbError, GapAnalysisRow, GapAnalysisSummaryRow, PoolConfig};
use chrono::Utc;
use uuid::Uuid;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        ad_library_url: "https://graph.example.com/ads_archive".to_string(),
        ad_library_token: None,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_inter_request_delay_ms: 250,
        scraper_max_retries: 3,
        scraper_retry_backoff_base_secs: 5,
        anthropic_api_key: None,
        llm_url: "https://llm.example.com".to_string(),
        llm_model: "model".to_string(),
        llm_max_tokens: 1024,
        llm_request_timeout_secs: 60,
        analysis: AnalysisConfig::default(),
    }
}

fn analysis_result() -> AnalysisResult {
    let mut subject = BrandProfile::empty("Summit Roofing");
    subject.ad_count = 4;
    AnalysisResult {
        analysis_id: Uuid::new_v4(),
        created_at: Utc::now(),
        subject,
        competitors: std::array::from_fn(|i| BrandProfile::empty(&format!("Competitor {i}"))),
        gaps: GapSet::default(),
        recommendations: Vec::new(),
        market_insights: MarketInsights {
            dominant_hook_type: None,
            dominant_format: None,
            dominant_tone: None,
            average_competitor_ad_count: 0,
            most_common_cta: None,
            most_common_trust_signal: None,
        },
        narrative: "Nothing to report.".to_string(),
        warnings: vec!["only 0 of 5 competitors returned ads".to_string()],
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn gap_analysis_row_decodes_stored_result() {
    let result = analysis_result();
    let row = GapAnalysisRow {
        id: 1,
        public_id: result.analysis_id,
        subject_name: result.subject.name.clone(),
        ad_count: 4,
        result: serde_json::to_value(&result).unwrap(),
        created_at: result.created_at,
    };

    let decoded = row.decode_result().expect("stored result should decode");
    assert_eq!(decoded, result);
}

#[test]
fn gap_analysis_row_with_foreign_json_is_a_serialization_error() {
    let row = GapAnalysisRow {
        id: 1,
        public_id: Uuid::new_v4(),
        subject_name: "Summit Roofing".to_string(),
        ad_count: 0,
        result: serde_json::json!({"unexpected": true}),
        created_at: Utc::now(),
    };

    assert!(matches!(row.decode_result(), Err(DbError::Serialization(_))));
}

/// Compile-time smoke test: confirm that [`GapAnalysisSummaryRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn summary_row_has_expected_fields() {
    let row = GapAnalysisSummaryRow {
        id: 3_i64,
        public_id: Uuid::nil(),
        subject_name: "Summit Roofing".to_string(),
        ad_count: 12_i32,
        created_at: Utc::now(),
    };
    assert_eq!(row.id, 3);
    assert_eq!(row.ad_count, 12);
    assert!(row.public_id.is_nil());
}

/// Compile-time smoke test: confirm that [`AnalysisAdRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn analysis_ad_row_has_expected_fields() {
    let row = AnalysisAdRow {
        id: 10_i64,
        analysis_id: 3_i64,
        brand_name: "Peak Exteriors".to_string(),
        is_subject: false,
        creative_id: "238491".to_string(),
        platform: "facebook".to_string(),
        ad_text: "Storm season is here.".to_string(),
        started_at: None,
        classification: serde_json::json!({"hookType": "Other"}),
        created_at: Utc::now(),
    };
    assert_eq!(row.analysis_id, 3);
    assert!(!row.is_subject);
    assert!(row.started_at.is_none());
    assert_eq!(row.classification["hookType"], "Other");
}
