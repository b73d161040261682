//! Prompt text sent to the generative service.

use std::fmt::Write as _;

use adgap_core::{AdCreative, BrandProfile, GapSet, HookType, MarketInsights, Tone};

/// System prompt for batch classification.
#[must_use]
pub fn classification_system_prompt() -> String {
    let hooks: Vec<&str> = HookType::ALL.iter().map(|h| h.label()).collect();
    let tones: Vec<&str> = Tone::ALL.iter().map(|t| t.label()).collect();
    format!(
        "You are an advertising analyst. Classify each numbered ad creative.\n\
         Respond with only a JSON array, one object per ad, with fields:\n\
         index (the ad number), hookType (one of: {hooks}), headline (core value \
         proposition in a few words), cta (call to action), offer (or null), \
         painPoint (or null), audienceSignals (array of strings), tone (one of: \
         {tones}), adLength (short, medium or long), trustSignals (array of \
         strings), uniqueSellingPoint (or null).",
        hooks = hooks.join(", "),
        tones = tones.join(", "),
    )
}

/// User prompt listing a batch of creatives, each truncated to
/// `text_prefix_chars` characters.
#[must_use]
pub fn build_classification_prompt(batch: &[AdCreative], text_prefix_chars: usize) -> String {
    let mut prompt = String::new();
    for (index, creative) in batch.iter().enumerate() {
        let _ = writeln!(prompt, "Ad {index}:");
        let _ = writeln!(prompt, "Format: {}", creative.format());
        if let Some(title) = creative.title.as_deref().filter(|t| !t.trim().is_empty()) {
            let _ = writeln!(prompt, "Title: {}", title.trim());
        }
        let _ = writeln!(
            prompt,
            "Text: {}",
            truncate_chars(creative.text.trim(), text_prefix_chars)
        );
        prompt.push('\n');
    }
    prompt
}

/// System prompt for recommendation generation.
pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are a performance marketing strategist. \
Given a brand's ad profile, five competitors' profiles, the detected gaps and market \
patterns, write a short narrative explaining the most important gaps and a ranked list \
of concrete recommendations. Respond with only a JSON object: {\"narrative\": string, \
\"recommendations\": [{\"priority\": \"high\"|\"medium\"|\"low\", \"action\": string, \
\"example\": string, \"implementation\": string}]}. Every recommendation field must be \
non-empty.";

/// Summarizes the analysis inputs for the recommendation service.
#[must_use]
pub fn build_recommendation_prompt(
    subject: &BrandProfile,
    competitors: &[BrandProfile],
    gaps: &GapSet,
    market: &MarketInsights,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "## Subject brand");
    write_profile(&mut prompt, subject);

    let _ = writeln!(prompt, "\n## Competitors");
    for competitor in competitors {
        write_profile(&mut prompt, competitor);
    }

    let _ = writeln!(prompt, "\n## Gaps");
    let hooks: Vec<&str> = gaps.missing_hooks.iter().map(|h| h.label()).collect();
    let formats: Vec<&str> = gaps.underutilized_formats.iter().map(|f| f.as_str()).collect();
    write_list(&mut prompt, "Missing hook types", &hooks);
    write_list(&mut prompt, "Underutilized formats", &formats);
    write_list(&mut prompt, "Competitors running more ads", &gaps.winning_competitors);
    write_list(&mut prompt, "Missing CTAs", &gaps.missing_ctas);
    write_list(&mut prompt, "Missing trust signals", &gaps.missing_trust_signals);
    write_list(&mut prompt, "Competitor offers", &gaps.competitor_offers);
    write_list(&mut prompt, "Tone gaps", &gaps.tone_gaps);

    let _ = writeln!(prompt, "\n## Market");
    let _ = writeln!(
        prompt,
        "Dominant hook: {}",
        market.dominant_hook_type.map_or("n/a", HookType::label)
    );
    let _ = writeln!(
        prompt,
        "Dominant format: {}",
        market.dominant_format.map_or("n/a", |f| f.as_str())
    );
    let _ = writeln!(
        prompt,
        "Dominant tone: {}",
        market.dominant_tone.map_or("n/a", Tone::label)
    );
    let _ = writeln!(
        prompt,
        "Average competitor ad count: {}",
        market.average_competitor_ad_count
    );
    let _ = writeln!(
        prompt,
        "Most common CTA: {}",
        market.most_common_cta.as_deref().unwrap_or("n/a")
    );
    let _ = writeln!(
        prompt,
        "Most common trust signal: {}",
        market.most_common_trust_signal.as_deref().unwrap_or("n/a")
    );

    prompt
}

fn write_profile(out: &mut String, profile: &BrandProfile) {
    let _ = writeln!(out, "### {} ({} ads)", profile.name, profile.ad_count);
    if profile.ad_count == 0 {
        return;
    }
    let hooks: Vec<String> = profile
        .hook_distribution
        .iter()
        .map(|(hook, n)| format!("{hook}: {n}"))
        .collect();
    let tones: Vec<String> = profile
        .tone_distribution
        .iter()
        .map(|(tone, n)| format!("{tone}: {n}"))
        .collect();
    let ctas: Vec<String> = profile
        .cta_distribution
        .iter()
        .map(|(cta, n)| format!("{cta}: {n}"))
        .collect();
    let formats = &profile.format_distribution;
    let lengths = &profile.ad_length_distribution;
    write_list(out, "Hooks", &hooks);
    let _ = writeln!(
        out,
        "- Formats: video {}, image {}, ugc_video {}, carousel {}",
        formats.video, formats.image, formats.ugc_video, formats.carousel
    );
    write_list(out, "CTAs", &ctas);
    write_list(out, "Tones", &tones);
    let _ = writeln!(
        out,
        "- Lengths: short {}, medium {}, long {}",
        lengths.short, lengths.medium, lengths.long
    );
    write_list(out, "Offers", &profile.offers_used);
    write_list(out, "Trust signals", &profile.trust_signals_used);
    write_list(out, "Pain points", &profile.pain_points_addressed);
    write_list(out, "USPs", &profile.usps);
}

fn write_list<S: AsRef<str>>(out: &mut String, label: &str, items: &[S]) {
    if items.is_empty() {
        let _ = writeln!(out, "- {label}: none");
        return;
    }
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    let _ = writeln!(out, "- {label}: {}", joined.join(", "));
}

/// First `max_chars` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creative(id: &str, text: &str, title: Option<&str>) -> AdCreative {
        AdCreative {
            id: id.to_string(),
            brand_name: "Summit Roofing".to_string(),
            text: text.to_string(),
            title: title.map(str::to_string),
            image_ref: None,
            video_ref: None,
            platform: "facebook".to_string(),
            started_at: None,
        }
    }

    #[test]
    fn truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 40), "short");
    }

    #[test]
    fn classification_prompt_numbers_ads_and_truncates_text() {
        let batch = vec![
            creative("a", "Storm damage? We can help today.", Some("Free Inspection")),
            creative("b", &"x".repeat(500), None),
        ];
        let prompt = build_classification_prompt(&batch, 10);
        assert!(prompt.contains("Ad 0:"));
        assert!(prompt.contains("Ad 1:"));
        assert!(prompt.contains("Title: Free Inspection"));
        assert!(prompt.contains("Text: Storm dama\n"));
        assert!(prompt.contains(&format!("Text: {}\n", "x".repeat(10))));
        assert!(!prompt.contains(&"x".repeat(11)));
    }

    #[test]
    fn system_prompt_lists_closed_sets() {
        let system = classification_system_prompt();
        assert!(system.contains("Problem-Agitate"));
        assert!(system.contains("Fear-based"));
    }

    #[test]
    fn recommendation_prompt_mentions_gaps_and_market() {
        let subject = BrandProfile::empty("Summit Roofing");
        let competitors = vec![BrandProfile::empty("Peak Exteriors")];
        let gaps = GapSet {
            missing_hooks: vec![HookType::SocialProof],
            missing_ctas: vec!["Book Now".to_string()],
            ..GapSet::default()
        };
        let market = MarketInsights {
            dominant_hook_type: Some(HookType::SocialProof),
            dominant_format: None,
            dominant_tone: None,
            average_competitor_ad_count: 12,
            most_common_cta: Some("Book Now".to_string()),
            most_common_trust_signal: None,
        };
        let prompt = build_recommendation_prompt(&subject, &competitors, &gaps, &market);
        assert!(prompt.contains("### Summit Roofing (0 ads)"));
        assert!(prompt.contains("### Peak Exteriors (0 ads)"));
        assert!(prompt.contains("- Missing hook types: Social Proof"));
        assert!(prompt.contains("- Missing CTAs: Book Now"));
        assert!(prompt.contains("- Tone gaps: none"));
        assert!(prompt.contains("Average competitor ad count: 12"));
        assert!(prompt.contains("Dominant format: n/a"));
    }
}
