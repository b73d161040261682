//! Folds one brand's classified creatives into a [`BrandProfile`].

use adgap_core::classification::UNKNOWN_CTA;
use adgap_core::{normalize_label, push_unique, AdClassification, AdCreative, BrandProfile};

/// Build the profile for `brand_name` from its creatives.
///
/// `classifications[i]` belongs to `creatives[i]`. Creatives past the end of
/// `classifications` are counted with
/// [`AdClassification::fallback`], so every distribution sums to
/// `ad_count`. CTA labels differing only in case or surrounding whitespace
/// share one bucket under the first-seen spelling.
#[must_use]
pub fn aggregate(
    brand_name: &str,
    creatives: &[AdCreative],
    classifications: &[AdClassification],
) -> BrandProfile {
    let mut profile = BrandProfile::empty(brand_name);

    for (i, creative) in creatives.iter().enumerate() {
        let fallback;
        let classification = if let Some(c) = classifications.get(i) {
            c
        } else {
            fallback = AdClassification::fallback(creative);
            &fallback
        };

        profile.ad_count += 1;
        *profile
            .hook_distribution
            .entry(classification.hook_type)
            .or_insert(0) += 1;
        profile.format_distribution.increment(creative.format());
        *profile
            .tone_distribution
            .entry(classification.tone)
            .or_insert(0) += 1;
        profile
            .ad_length_distribution
            .increment(classification.ad_length);

        let cta_key = cta_bucket(&profile, &classification.cta);
        *profile.cta_distribution.entry(cta_key).or_insert(0) += 1;

        if let Some(offer) = &classification.offer {
            push_unique(&mut profile.offers_used, offer);
        }
        for signal in &classification.trust_signals {
            push_unique(&mut profile.trust_signals_used, signal);
        }
        if let Some(pain) = &classification.pain_point {
            push_unique(&mut profile.pain_points_addressed, pain);
        }
        if let Some(usp) = &classification.unique_selling_point {
            push_unique(&mut profile.usps, usp);
        }
    }

    profile
}

/// Existing distribution key equal to `cta` under [`normalize_label`], or the
/// trimmed label itself. Blank CTAs count as [`UNKNOWN_CTA`].
fn cta_bucket(profile: &BrandProfile, cta: &str) -> String {
    let trimmed = cta.trim();
    if trimmed.is_empty() {
        return UNKNOWN_CTA.to_string();
    }
    let key = normalize_label(trimmed);
    profile
        .cta_distribution
        .keys()
        .find(|existing| normalize_label(existing) == key)
        .cloned()
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use adgap_core::{AdFormat, AdLength, HookType, Tone};

    use super::*;

    fn creative(id: &str, text: &str, video: bool) -> AdCreative {
        AdCreative {
            id: id.to_string(),
            brand_name: "Peak Exteriors".to_string(),
            text: text.to_string(),
            title: None,
            image_ref: Some(format!("https://cdn.example.com/{id}.jpg")),
            video_ref: video.then(|| format!("https://cdn.example.com/{id}.mp4")),
            platform: "facebook".to_string(),
            started_at: None,
        }
    }

    fn classified(hook: HookType, cta: &str, tone: Tone) -> AdClassification {
        AdClassification {
            hook_type: hook,
            headline: "Headline".to_string(),
            cta: cta.to_string(),
            offer: None,
            pain_point: None,
            audience_signals: Vec::new(),
            tone,
            ad_length: AdLength::Short,
            trust_signals: Vec::new(),
            unique_selling_point: None,
        }
    }

    #[test]
    fn empty_input_yields_zeroed_profile() {
        let profile = aggregate("Peak Exteriors", &[], &[]);
        assert_eq!(profile, BrandProfile::empty("Peak Exteriors"));
    }

    #[test]
    fn distributions_sum_to_ad_count() {
        let ads = vec![
            creative("1", "short", true),
            creative("2", "short", false),
            creative("3", "short", false),
        ];
        let classifications = vec![
            classified(HookType::SocialProof, "Get a Quote", Tone::Friendly),
            classified(HookType::SocialProof, "get a quote ", Tone::Urgent),
        ];
        // "3" has no classification and falls back.

        let profile = aggregate("Peak Exteriors", &ads, &classifications);

        assert_eq!(profile.ad_count, 3);
        assert_eq!(profile.hook_distribution.values().sum::<u32>(), 3);
        assert_eq!(profile.tone_distribution.values().sum::<u32>(), 3);
        assert_eq!(profile.cta_distribution.values().sum::<u32>(), 3);
        assert_eq!(profile.format_distribution.total(), 3);
        assert_eq!(profile.ad_length_distribution.total(), 3);

        assert_eq!(profile.hook_count(HookType::SocialProof), 2);
        assert_eq!(profile.hook_count(HookType::Other), 1);
        assert_eq!(profile.cta_distribution["Get a Quote"], 2);
        assert_eq!(profile.cta_distribution[UNKNOWN_CTA], 1);
        assert_eq!(profile.format_distribution.get(AdFormat::Video), 1);
        assert_eq!(profile.format_distribution.get(AdFormat::Image), 2);
    }

    #[test]
    fn lists_are_deduplicated_case_insensitively() {
        let ads = vec![creative("1", "a", false), creative("2", "b", false)];
        let mut first = classified(HookType::Authority, "Call Now", Tone::Professional);
        first.offer = Some("Free inspection".to_string());
        first.trust_signals = vec!["Licensed & insured".to_string()];
        first.pain_point = Some("Leaks".to_string());
        first.unique_selling_point = Some("One-day install".to_string());
        let mut second = first.clone();
        second.offer = Some("FREE INSPECTION".to_string());
        second.trust_signals = vec![
            "licensed & insured".to_string(),
            "GAF Master Elite".to_string(),
        ];

        let profile = aggregate("Peak Exteriors", &ads, &[first, second]);

        assert_eq!(profile.offers_used, vec!["Free inspection"]);
        assert_eq!(
            profile.trust_signals_used,
            vec!["Licensed & insured", "GAF Master Elite"]
        );
        assert_eq!(profile.pain_points_addressed, vec!["Leaks"]);
        assert_eq!(profile.usps, vec!["One-day install"]);
    }

    #[test]
    fn repeated_ids_are_counted_by_position() {
        let ads = vec![creative("dup", "a", false), creative("dup", "b", true)];
        let classifications = vec![
            classified(HookType::SocialProof, "Call Now", Tone::Friendly),
            classified(HookType::DiscountUrgency, "Book Today", Tone::Urgent),
        ];

        let profile = aggregate("Peak Exteriors", &ads, &classifications);

        assert_eq!(profile.hook_count(HookType::SocialProof), 1);
        assert_eq!(profile.hook_count(HookType::DiscountUrgency), 1);
        assert_eq!(profile.cta_distribution["Book Today"], 1);
    }

    #[test]
    fn aggregation_is_idempotent_down_to_the_bytes() {
        let ads = vec![
            creative("1", "Storm damage? We can help.", true),
            creative("2", "Five-star rated roofers", false),
            creative("3", "Financing available", false),
        ];
        let mut first = classified(HookType::ProblemAgitate, "Get a Quote", Tone::Urgent);
        first.offer = Some("0% financing".to_string());
        first.trust_signals = vec!["BBB A+".to_string(), "Licensed".to_string()];
        let mut second = classified(HookType::SocialProof, "Call Now", Tone::Friendly);
        second.pain_point = Some("Storm damage".to_string());
        second.unique_selling_point = Some("Lifetime warranty".to_string());
        // "3" falls back.
        let classifications = vec![first, second];

        let once = aggregate("Peak Exteriors", &ads, &classifications);
        let twice = aggregate("Peak Exteriors", &ads, &classifications);

        assert_eq!(once, twice);
        assert_eq!(
            serde_json::to_vec(&once).unwrap(),
            serde_json::to_vec(&twice).unwrap()
        );
    }
}
