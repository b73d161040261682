//! Consensus gap detection between the subject and its competitors.

use std::collections::{HashMap, HashSet};

use adgap_core::classification::UNKNOWN_CTA;
use adgap_core::{normalize_label, push_unique, AdFormat, BrandProfile, GapSet, HookType};

/// Competitors that must use a pattern before its absence counts as a gap.
pub const CONSENSUS_MIN: usize = 2;

/// Average competitor share a format needs before it can be underutilized.
const FORMAT_SHARE_FLOOR: f64 = 0.20;

/// Compare the subject profile against the competitor profiles.
///
/// Hook and tone gaps follow declaration order; string gaps follow first
/// appearance across competitors, reported with the first-seen spelling.
#[must_use]
pub fn compute_gaps(subject: &BrandProfile, competitors: &[BrandProfile]) -> GapSet {
    GapSet {
        missing_hooks: missing_hooks(subject, competitors),
        underutilized_formats: underutilized_formats(subject, competitors),
        winning_competitors: competitors
            .iter()
            .filter(|c| c.ad_count > subject.ad_count)
            .map(|c| c.name.clone())
            .collect(),
        missing_ctas: consensus_gaps(
            ctas(subject),
            competitors.iter().map(|c| ctas(c).collect::<Vec<_>>()),
        ),
        missing_trust_signals: consensus_gaps(
            subject.trust_signals_used.iter().map(String::as_str),
            competitors
                .iter()
                .map(|c| c.trust_signals_used.iter().map(String::as_str).collect::<Vec<_>>()),
        ),
        competitor_offers: competitor_offers(competitors),
        tone_gaps: consensus_gaps(
            tones(subject),
            competitors.iter().map(|c| tones(c).collect::<Vec<_>>()),
        ),
    }
}

fn missing_hooks(subject: &BrandProfile, competitors: &[BrandProfile]) -> Vec<HookType> {
    HookType::ALL
        .into_iter()
        .filter(|&hook| {
            subject.hook_count(hook) == 0
                && competitors.iter().filter(|c| c.hook_count(hook) > 0).count() >= CONSENSUS_MIN
        })
        .collect()
}

/// A format is underutilized when competitors average more than
/// [`FORMAT_SHARE_FLOOR`] of their ads in it and the subject is below half of
/// that average. Competitors with no ads contribute a share of zero.
fn underutilized_formats(subject: &BrandProfile, competitors: &[BrandProfile]) -> Vec<AdFormat> {
    if competitors.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = competitors.len() as f64;

    AdFormat::ALL
        .into_iter()
        .filter(|&format| {
            let average = competitors.iter().map(|c| c.format_share(format)).sum::<f64>() / n;
            average > FORMAT_SHARE_FLOOR && subject.format_share(format) < average / 2.0
        })
        .collect()
}

fn competitor_offers(competitors: &[BrandProfile]) -> Vec<String> {
    let mut offers = Vec::new();
    for competitor in competitors {
        for offer in &competitor.offers_used {
            push_unique(&mut offers, offer);
        }
    }
    offers
}

/// Labels used by at least [`CONSENSUS_MIN`] competitors and absent from the
/// subject, compared under [`normalize_label`].
fn consensus_gaps<'a, S, C>(subject: S, competitors: C) -> Vec<String>
where
    S: IntoIterator<Item = &'a str>,
    C: IntoIterator,
    C::Item: IntoIterator<Item = &'a str>,
{
    let subject_keys: HashSet<String> = subject.into_iter().map(normalize_label).collect();

    // (display spelling, competitor count) in first-seen order.
    let mut tallies: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for labels in competitors {
        let mut seen_here: HashSet<String> = HashSet::new();
        for label in labels {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = normalize_label(trimmed);
            if !seen_here.insert(key.clone()) {
                continue;
            }
            match positions.get(&key) {
                Some(&i) => tallies[i].1 += 1,
                None => {
                    positions.insert(key, tallies.len());
                    tallies.push((trimmed.to_string(), 1));
                }
            }
        }
    }

    tallies
        .into_iter()
        .filter(|(label, count)| {
            *count >= CONSENSUS_MIN && !subject_keys.contains(&normalize_label(label))
        })
        .map(|(label, _)| label)
        .collect()
}

/// CTA labels in use, excluding the unknown sentinel.
fn ctas(profile: &BrandProfile) -> impl Iterator<Item = &str> {
    profile
        .cta_distribution
        .iter()
        .filter(|(cta, count)| **count > 0 && normalize_label(cta) != normalize_label(UNKNOWN_CTA))
        .map(|(cta, _)| cta.as_str())
}

fn tones(profile: &BrandProfile) -> impl Iterator<Item = &'static str> + '_ {
    profile
        .tone_distribution
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(tone, _)| tone.label())
}

#[cfg(test)]
#[path = "gaps_test.rs"]
mod tests;
