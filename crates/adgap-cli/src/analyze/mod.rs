//! `analyze` command handler.

pub(crate) mod adapters;

use std::path::Path;
use std::sync::Arc;

use adgap_core::AppConfig;
use adgap_engine::{
    validate_competitor_set, AnthropicClient, LlmClassificationService, LlmRecommendationService,
    Orchestrator, TextGenerator,
};
use adgap_scraper::AdLibraryClient;
use anyhow::Context;
use sqlx::PgPool;

use crate::report::print_result;
use crate::OutputFormat;

use adapters::{AdLibrarySource, PgAnalysisStore};

/// Validate the competitor file and print what would be analyzed.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or does not hold exactly one
/// subject and five competitors.
pub(crate) fn run_dry_run(input: &Path) -> anyhow::Result<()> {
    let set = adgap_core::load_competitor_set(input)
        .with_context(|| format!("loading competitor set {}", input.display()))?;
    let (subject, competitors) = validate_competitor_set(&set.brands)?;

    let keys: Vec<String> = competitors
        .iter()
        .map(|c| format!("{} ({})", c.name, c.search_key()))
        .collect();
    println!(
        "dry-run: would analyze {} ({}) against {} competitors: [{}]",
        subject.name,
        subject.search_key(),
        competitors.len(),
        keys.join(", ")
    );
    Ok(())
}

/// Run one gap analysis and print the stored result.
///
/// # Errors
///
/// Returns an error if the input is invalid, `ANTHROPIC_API_KEY` is unset,
/// a client cannot be built, the subject has no ads, or the result cannot be
/// stored.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    pool: PgPool,
    input: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let set = adgap_core::load_competitor_set(input)
        .with_context(|| format!("loading competitor set {}", input.display()))?;
    validate_competitor_set(&set.brands)?;

    let api_key = config
        .anthropic_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))?;

    let ad_library = AdLibraryClient::new(
        &config.ad_library_url,
        config.ad_library_token.as_deref(),
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;
    let generator: Arc<dyn TextGenerator> = Arc::new(AnthropicClient::new(
        &config.llm_url,
        api_key,
        &config.llm_model,
        config.llm_max_tokens,
        config.llm_request_timeout_secs,
    )?);

    let orchestrator = Orchestrator::new(
        config.analysis.clone(),
        Arc::new(AdLibrarySource::new(
            ad_library,
            config.scraper_inter_request_delay_ms,
        )),
        Arc::new(LlmClassificationService::new(
            Arc::clone(&generator),
            config.analysis.classify_text_prefix_chars,
        )),
        Arc::new(LlmRecommendationService::new(generator)),
        Arc::new(PgAnalysisStore::new(pool)),
    );

    let result = orchestrator.run(&set.brands).await.map_err(|e| {
        if e.is_validation() {
            anyhow::anyhow!("invalid competitor set: {e}")
        } else {
            anyhow::Error::new(e).context("gap analysis failed")
        }
    })?;

    for warning in &result.warnings {
        tracing::warn!(analysis_id = %result.analysis_id, "{warning}");
    }
    print_result(&result, format)
}
