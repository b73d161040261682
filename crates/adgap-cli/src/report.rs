//! Rendering of analysis results for the terminal.

use std::fmt::Write as _;

use adgap_core::{AnalysisResult, BrandProfile};

use crate::OutputFormat;

/// Print `result` to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub(crate) fn print_result(result: &AnalysisResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => print!("{}", render_markdown(result)),
    }
    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn brand_row(out: &mut String, profile: &BrandProfile, role: &str) {
    let top_hook = profile
        .hook_distribution
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map_or("-", |(hook, _)| hook.label());
    let formats = &profile.format_distribution;
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {}/{} | {} |",
        profile.name,
        role,
        profile.ad_count,
        top_hook,
        formats.video,
        formats.image,
        profile.trust_signals_used.len(),
    );
}

/// Render a full analysis as a markdown report.
pub(crate) fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let generated = result.created_at.format("%Y-%m-%d %H:%M UTC");

    let _ = writeln!(out, "# Ad Gap Analysis: {}", result.subject.name);
    out.push('\n');
    let _ = writeln!(out, "**Analysis**: {}", result.analysis_id);
    let _ = writeln!(out, "**Generated**: {generated}");
    out.push('\n');
    out.push_str("---\n\n");

    out.push_str("## Brands\n\n");
    out.push_str("| Brand | Role | Ads | Top Hook | Video/Image | Trust Signals |\n");
    out.push_str("|-------|------|-----|----------|-------------|---------------|\n");
    brand_row(&mut out, &result.subject, "subject");
    for competitor in &result.competitors {
        brand_row(&mut out, competitor, "competitor");
    }
    out.push('\n');

    let gaps = &result.gaps;
    out.push_str("## Gaps\n\n");
    if gaps.is_empty() {
        out.push_str("No consensus gaps detected.\n");
    } else {
        let hooks: Vec<String> = gaps
            .missing_hooks
            .iter()
            .map(|h| h.label().to_string())
            .collect();
        let formats: Vec<String> = gaps
            .underutilized_formats
            .iter()
            .map(|f| f.as_str().to_string())
            .collect();
        let _ = writeln!(out, "- **Missing hooks**: {}", list_or_none(&hooks));
        let _ = writeln!(out, "- **Underutilized formats**: {}", list_or_none(&formats));
        let _ = writeln!(
            out,
            "- **Out-publishing competitors**: {}",
            list_or_none(&gaps.winning_competitors)
        );
        let _ = writeln!(out, "- **Missing CTAs**: {}", list_or_none(&gaps.missing_ctas));
        let _ = writeln!(
            out,
            "- **Missing trust signals**: {}",
            list_or_none(&gaps.missing_trust_signals)
        );
        let _ = writeln!(
            out,
            "- **Competitor offers**: {}",
            list_or_none(&gaps.competitor_offers)
        );
        let _ = writeln!(out, "- **Tone gaps**: {}", list_or_none(&gaps.tone_gaps));
    }
    out.push('\n');

    let market = &result.market_insights;
    out.push_str("## Market\n\n");
    let _ = writeln!(
        out,
        "- **Dominant hook**: {}",
        market.dominant_hook_type.map_or("-", |h| h.label())
    );
    let _ = writeln!(
        out,
        "- **Dominant format**: {}",
        market.dominant_format.map_or("-", |f| f.as_str())
    );
    let _ = writeln!(
        out,
        "- **Dominant tone**: {}",
        market.dominant_tone.map_or("-", |t| t.label())
    );
    let _ = writeln!(
        out,
        "- **Average competitor ads**: {}",
        market.average_competitor_ad_count
    );
    let _ = writeln!(
        out,
        "- **Most common CTA**: {}",
        market.most_common_cta.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "- **Most common trust signal**: {}",
        market.most_common_trust_signal.as_deref().unwrap_or("-")
    );
    out.push('\n');

    out.push_str("## Recommendations\n\n");
    for (i, rec) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. **[{}]** {}", i + 1, rec.priority, rec.action);
        if !rec.example.is_empty() {
            let _ = writeln!(out, "   - Example: {}", rec.example);
        }
        let _ = writeln!(out, "   - How: {}", rec.implementation);
    }
    out.push('\n');

    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "{}", result.narrative);

    if !result.warnings.is_empty() {
        out.push('\n');
        out.push_str("## Warnings\n\n");
        for warning in &result.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use adgap_core::{
        GapSet, HookType, MarketInsights, Priority, Recommendation, Tone, COMPETITOR_COUNT,
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn result() -> AnalysisResult {
        let mut subject = BrandProfile::empty("Summit Roofing");
        subject.ad_count = 2;
        subject.hook_distribution.insert(HookType::DiscountUrgency, 2);
        subject.format_distribution.image = 2;

        let competitors: [BrandProfile; COMPETITOR_COUNT] =
            std::array::from_fn(|i| BrandProfile::empty(&format!("Rival {i}")));

        AnalysisResult {
            analysis_id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            subject,
            competitors,
            gaps: GapSet {
                missing_hooks: vec![HookType::SocialProof],
                missing_ctas: vec!["Call Now".to_string()],
                ..GapSet::default()
            },
            recommendations: vec![Recommendation {
                priority: Priority::High,
                action: "Add homeowner testimonials".to_string(),
                example: String::new(),
                implementation: "Film two customers after install.".to_string(),
            }],
            market_insights: MarketInsights {
                dominant_hook_type: Some(HookType::SocialProof),
                dominant_format: None,
                dominant_tone: Some(Tone::Urgent),
                average_competitor_ad_count: 3,
                most_common_cta: Some("Call Now".to_string()),
                most_common_trust_signal: None,
            },
            narrative: "Competitors lean on social proof.".to_string(),
            warnings: vec!["only 4 of 5 competitors returned ads".to_string()],
        }
    }

    #[test]
    fn markdown_report_has_all_sections() {
        let md = render_markdown(&result());

        assert!(md.starts_with("# Ad Gap Analysis: Summit Roofing\n"));
        assert!(md.contains("**Generated**: 2026-03-01 12:00 UTC"));
        assert!(md.contains("| Summit Roofing | subject | 2 | Discount/Urgency | 0/2 | 0 |"));
        assert!(md.contains("| Rival 4 | competitor | 0 | - | 0/0 | 0 |"));
        assert!(md.contains("- **Missing hooks**: Social Proof"));
        assert!(md.contains("- **Missing CTAs**: Call Now"));
        assert!(md.contains("- **Tone gaps**: none"));
        assert!(md.contains("- **Dominant format**: -"));
        assert!(md.contains("1. **[high]** Add homeowner testimonials"));
        assert!(md.contains("   - How: Film two customers after install."));
        assert!(md.contains("## Warnings\n\n- only 4 of 5 competitors returned ads"));
    }

    #[test]
    fn empty_example_line_is_omitted() {
        let md = render_markdown(&result());
        assert!(!md.contains("Example:"));
    }

    #[test]
    fn no_gaps_and_no_warnings_render_compactly() {
        let mut r = result();
        r.gaps = GapSet::default();
        r.warnings.clear();

        let md = render_markdown(&r);
        assert!(md.contains("No consensus gaps detected."));
        assert!(!md.contains("## Warnings"));
    }
}
