//! Read-only analysis query handlers.

use adgap_engine::AnalysisStore;
use uuid::Uuid;

use crate::analyze::adapters::PgAnalysisStore;
use crate::report::print_result;
use crate::OutputFormat;

/// Print one stored analysis.
///
/// # Errors
///
/// Returns an error if the analysis does not exist or cannot be decoded.
pub(crate) async fn run_show(
    pool: &sqlx::PgPool,
    id: Uuid,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = PgAnalysisStore::new(pool.clone());
    let result = store
        .fetch(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("analysis '{id}' not found"))?;

    print_result(&result, format)?;

    if format == OutputFormat::Markdown {
        let ads = adgap_db::list_analysis_ads(pool, id).await?;
        let subject_ads = ads.iter().filter(|a| a.is_subject).count();
        println!();
        println!(
            "**Linked ads**: {} ({subject_ads} subject, {} competitor)",
            ads.len(),
            ads.len() - subject_ads
        );
    }

    Ok(())
}

/// List recent analyses, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_list(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let rows = adgap_db::list_gap_analyses(pool, limit).await?;

    if rows.is_empty() {
        println!("no analyses found; run `analyze --input <file>` first");
        return Ok(());
    }

    println!("{:<38}{:<25}{:<18}ADS", "ID", "SUBJECT", "CREATED");
    for row in &rows {
        let created = row.created_at.format("%Y-%m-%d %H:%M").to_string();
        println!(
            "{:<38}{:<25}{:<18}{}",
            row.public_id.to_string(),
            row.subject_name,
            created,
            row.ad_count
        );
    }

    Ok(())
}
