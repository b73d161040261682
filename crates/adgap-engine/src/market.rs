//! Market-wide patterns pooled across competitor profiles.

use std::collections::{BTreeMap, HashMap};

use adgap_core::classification::UNKNOWN_CTA;
use adgap_core::{normalize_label, AdFormat, BrandProfile, HookType, MarketInsights, Tone};

/// Key with the highest count. Ties go to the smallest key; zero counts never
/// win. Returns `None` when nothing was counted.
pub fn dominant<K, I>(counts: I) -> Option<K>
where
    K: Ord,
    I: IntoIterator<Item = (K, u32)>,
{
    let mut best: Option<(K, u32)> = None;
    for (key, count) in counts {
        if count == 0 {
            continue;
        }
        let replace = match &best {
            None => true,
            Some((best_key, best_count)) => {
                count > *best_count || (count == *best_count && key < *best_key)
            }
        };
        if replace {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

/// Free-form labels pooled under [`normalize_label`], remembering the first
/// spelling seen for each.
#[derive(Default)]
struct LabelPool {
    counts: BTreeMap<String, u32>,
    spellings: HashMap<String, String>,
}

impl LabelPool {
    fn add(&mut self, label: &str, count: u32) {
        let trimmed = label.trim();
        if trimmed.is_empty() || count == 0 {
            return;
        }
        let key = normalize_label(trimmed);
        self.spellings
            .entry(key.clone())
            .or_insert_with(|| trimmed.to_string());
        *self.counts.entry(key).or_insert(0) += count;
    }

    fn dominant(self) -> Option<String> {
        let key = dominant(self.counts)?;
        self.spellings.get(&key).cloned()
    }
}

/// Pool every competitor distribution and pick the plurality value per
/// dimension.
#[must_use]
pub fn synthesize(competitors: &[BrandProfile]) -> MarketInsights {
    let mut hooks: BTreeMap<HookType, u32> = BTreeMap::new();
    let mut tones: BTreeMap<Tone, u32> = BTreeMap::new();
    let mut formats: BTreeMap<AdFormat, u32> = BTreeMap::new();
    let mut ctas = LabelPool::default();
    let mut trust_signals = LabelPool::default();
    let unknown = normalize_label(UNKNOWN_CTA);

    for competitor in competitors {
        for (hook, count) in &competitor.hook_distribution {
            *hooks.entry(*hook).or_insert(0) += count;
        }
        for (tone, count) in &competitor.tone_distribution {
            *tones.entry(*tone).or_insert(0) += count;
        }
        for format in AdFormat::ALL {
            *formats.entry(format).or_insert(0) += competitor.format_distribution.get(format);
        }
        for (cta, count) in &competitor.cta_distribution {
            if normalize_label(cta) != unknown {
                ctas.add(cta, *count);
            }
        }
        for signal in &competitor.trust_signals_used {
            trust_signals.add(signal, 1);
        }
    }

    MarketInsights {
        dominant_hook_type: dominant(hooks),
        dominant_format: dominant(formats),
        dominant_tone: dominant(tones),
        average_competitor_ad_count: average_ad_count(competitors),
        most_common_cta: ctas.dominant(),
        most_common_trust_signal: trust_signals.dominant(),
    }
}

/// Mean ad count, rounded half up.
fn average_ad_count(competitors: &[BrandProfile]) -> u32 {
    let n = competitors.len() as u64;
    if n == 0 {
        return 0;
    }
    let total: u64 = competitors.iter().map(|c| u64::from(c.ad_count)).sum();
    u32::try_from((total + n / 2) / n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, ad_count: u32) -> BrandProfile {
        let mut p = BrandProfile::empty(name);
        p.ad_count = ad_count;
        p
    }

    #[test]
    fn dominant_picks_highest_count() {
        let counts = vec![("b", 3), ("a", 1), ("c", 2)];
        assert_eq!(dominant(counts), Some("b"));
    }

    #[test]
    fn dominant_breaks_ties_by_smallest_key_regardless_of_order() {
        assert_eq!(dominant(vec![("zeta", 2), ("alpha", 2)]), Some("alpha"));
        assert_eq!(dominant(vec![("alpha", 2), ("zeta", 2)]), Some("alpha"));
        assert_eq!(
            dominant(vec![(Tone::Urgent, 4), (Tone::Professional, 4)]),
            Some(Tone::Professional)
        );
    }

    #[test]
    fn dominant_ignores_zero_counts() {
        assert_eq!(dominant(vec![("a", 0)]), None::<&str>);
        assert_eq!(dominant(Vec::<(&str, u32)>::new()), None);
    }

    #[test]
    fn average_rounds_to_nearest() {
        let competitors = vec![
            profile("A", 3),
            profile("B", 3),
            profile("C", 3),
            profile("D", 2),
            profile("E", 2),
        ];
        // 13 / 5 = 2.6
        assert_eq!(synthesize(&competitors).average_competitor_ad_count, 3);

        let competitors = vec![
            profile("A", 4),
            profile("B", 4),
            profile("C", 2),
            profile("D", 1),
            profile("E", 1),
        ];
        // 12 / 5 = 2.4
        assert_eq!(synthesize(&competitors).average_competitor_ad_count, 2);
    }

    #[test]
    fn empty_competitors_yield_no_dominant_values() {
        let competitors: Vec<BrandProfile> =
            (0..5).map(|i| profile(&format!("C{i}"), 0)).collect();
        let insights = synthesize(&competitors);
        assert_eq!(insights.dominant_hook_type, None);
        assert_eq!(insights.dominant_format, None);
        assert_eq!(insights.dominant_tone, None);
        assert_eq!(insights.most_common_cta, None);
        assert_eq!(insights.most_common_trust_signal, None);
        assert_eq!(insights.average_competitor_ad_count, 0);
    }

    #[test]
    fn pools_distributions_across_competitors() {
        let mut a = profile("A", 3);
        a.hook_distribution.insert(HookType::SocialProof, 2);
        a.hook_distribution.insert(HookType::Authority, 1);
        a.format_distribution.video = 3;
        a.cta_distribution.insert("Book Now".to_string(), 2);
        a.cta_distribution.insert(UNKNOWN_CTA.to_string(), 1);
        a.trust_signals_used = vec!["Licensed".to_string()];
        a.tone_distribution.insert(Tone::Friendly, 3);

        let mut b = profile("B", 3);
        b.hook_distribution.insert(HookType::Authority, 3);
        b.format_distribution.image = 3;
        b.cta_distribution.insert("book now".to_string(), 1);
        b.cta_distribution.insert(UNKNOWN_CTA.to_string(), 2);
        b.trust_signals_used = vec!["licensed".to_string(), "BBB A+".to_string()];
        b.tone_distribution.insert(Tone::Urgent, 3);

        let insights = synthesize(&[a, b]);

        assert_eq!(insights.dominant_hook_type, Some(HookType::Authority));
        // video 3 vs image 3: declaration order wins.
        assert_eq!(insights.dominant_format, Some(AdFormat::Video));
        assert_eq!(insights.dominant_tone, Some(Tone::Urgent));
        assert_eq!(insights.most_common_cta.as_deref(), Some("Book Now"));
        assert_eq!(insights.most_common_trust_signal.as_deref(), Some("Licensed"));
        assert_eq!(insights.average_competitor_ad_count, 3);
    }
}
