//! Validation of service recommendations and the local fallback.

use adgap_core::{BrandProfile, GapSet, Priority, Recommendation};

use crate::services::RawRecommendation;

/// Keep recommendations whose action, example and implementation are all
/// non-blank, sort them high to low (stable), and cap at `max`.
///
/// Unrecognized priorities become [`Priority::Medium`].
#[must_use]
pub fn validate_recommendations(raw: Vec<RawRecommendation>, max: usize) -> Vec<Recommendation> {
    let total = raw.len();
    let mut valid: Vec<Recommendation> = raw
        .into_iter()
        .filter_map(|r| {
            let action = non_blank(r.action)?;
            let example = non_blank(r.example)?;
            let implementation = non_blank(r.implementation)?;
            Some(Recommendation {
                priority: r
                    .priority
                    .as_deref()
                    .and_then(Priority::parse)
                    .unwrap_or(Priority::Medium),
                action,
                example,
                implementation,
            })
        })
        .collect();

    if valid.len() < total {
        tracing::debug!(
            dropped = total - valid.len(),
            "dropped incomplete recommendations"
        );
    }

    valid.sort_by_key(|r| r.priority);
    valid.truncate(max);
    valid
}

/// Single low-priority recommendation used when the service is unavailable.
#[must_use]
pub fn fallback_recommendation(gaps: &GapSet) -> Recommendation {
    let focus = if let Some(hook) = gaps.missing_hooks.first() {
        format!("test {hook} hooks, which several competitors already run")
    } else if let Some(cta) = gaps.missing_ctas.first() {
        format!("test the \"{cta}\" call to action used by several competitors")
    } else if let Some(format) = gaps.underutilized_formats.first() {
        format!("produce more {format} creatives")
    } else {
        "broaden the variety of creatives in rotation".to_string()
    };

    Recommendation {
        priority: Priority::Low,
        action: format!("Review the detected gaps and {focus}."),
        example: if let Some(offer) = gaps.competitor_offers.first() {
            format!("Competitor offer: {offer}")
        } else if let Some(signal) = gaps.missing_trust_signals.first() {
            format!("Competitor trust signal: {signal}")
        } else {
            "Run one new hook against your best-performing ad for two weeks.".to_string()
        },
        implementation: "Automated recommendations were unavailable for this run; \
                         use the gap lists in this report to plan the next creative test."
            .to_string(),
    }
}

/// Short plain-text summary used when the service returned no narrative.
#[must_use]
pub fn fallback_narrative(subject: &BrandProfile, gaps: &GapSet) -> String {
    let mut parts = vec![format!(
        "{} is running {} ad(s) in the analysis window.",
        subject.name, subject.ad_count
    )];
    if !gaps.winning_competitors.is_empty() {
        parts.push(format!(
            "{} competitor(s) run more ads: {}.",
            gaps.winning_competitors.len(),
            gaps.winning_competitors.join(", ")
        ));
    }
    if !gaps.missing_hooks.is_empty() {
        let hooks: Vec<&str> = gaps.missing_hooks.iter().map(|h| h.label()).collect();
        parts.push(format!("Missing hook types: {}.", hooks.join(", ")));
    }
    if !gaps.missing_ctas.is_empty() {
        parts.push(format!("Missing CTAs: {}.", gaps.missing_ctas.join(", ")));
    }
    if !gaps.missing_trust_signals.is_empty() {
        parts.push(format!(
            "Missing trust signals: {}.",
            gaps.missing_trust_signals.join(", ")
        ));
    }
    if gaps.is_empty() {
        parts.push("No consensus gaps were detected.".to_string());
    }
    parts.join(" ")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use adgap_core::HookType;

    use super::*;

    fn raw(priority: &str, action: &str, implementation: &str) -> RawRecommendation {
        RawRecommendation {
            priority: Some(priority.to_string()),
            action: Some(action.to_string()),
            example: Some("e.g.".to_string()),
            implementation: Some(implementation.to_string()),
        }
    }

    #[test]
    fn sorts_by_priority_and_keeps_order_within_a_level() {
        let recs = validate_recommendations(
            vec![
                raw("low", "L1", "i"),
                raw("high", "H1", "i"),
                raw("medium", "M1", "i"),
                raw("HIGH", "H2", "i"),
            ],
            10,
        );
        let actions: Vec<&str> = recs.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["H1", "H2", "M1", "L1"]);
    }

    #[test]
    fn drops_incomplete_items_and_defaults_priority() {
        let recs = validate_recommendations(
            vec![
                raw("urgent!", "Keep me", "do it"),
                raw("high", "  ", "missing action"),
                RawRecommendation {
                    priority: Some("high".to_string()),
                    action: Some("No implementation".to_string()),
                    example: Some("e.g.".to_string()),
                    ..RawRecommendation::default()
                },
                RawRecommendation {
                    example: Some(" \n ".to_string()),
                    ..raw("high", "Blank example", "do it")
                },
                RawRecommendation {
                    example: None,
                    ..raw("high", "No example", "do it")
                },
            ],
            10,
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, "Keep me");
        assert_eq!(recs[0].priority, Priority::Medium);
        assert_eq!(recs[0].example, "e.g.");
    }

    #[test]
    fn caps_at_max() {
        let raw_items = (0..15).map(|i| raw("low", &format!("A{i}"), "i")).collect();
        assert_eq!(validate_recommendations(raw_items, 10).len(), 10);
    }

    #[test]
    fn fallback_is_low_priority_and_names_a_gap() {
        let gaps = GapSet {
            missing_hooks: vec![HookType::SocialProof],
            competitor_offers: vec!["Free inspection".to_string()],
            ..GapSet::default()
        };
        let rec = fallback_recommendation(&gaps);
        assert_eq!(rec.priority, Priority::Low);
        assert!(rec.action.contains("Social Proof"));
        assert_eq!(rec.example, "Competitor offer: Free inspection");
        assert!(!rec.implementation.is_empty());
    }

    #[test]
    fn fallback_example_is_never_blank() {
        let rec = fallback_recommendation(&GapSet::default());
        assert!(!rec.example.trim().is_empty());

        let gaps = GapSet {
            missing_trust_signals: vec!["BBB A+".to_string()],
            ..GapSet::default()
        };
        assert_eq!(
            fallback_recommendation(&gaps).example,
            "Competitor trust signal: BBB A+"
        );
    }

    #[test]
    fn fallback_narrative_mentions_subject_and_gaps() {
        let mut subject = BrandProfile::empty("Summit Roofing");
        subject.ad_count = 4;
        let gaps = GapSet {
            winning_competitors: vec!["Peak Exteriors".to_string()],
            missing_ctas: vec!["Book Now".to_string()],
            ..GapSet::default()
        };
        let text = fallback_narrative(&subject, &gaps);
        assert!(text.starts_with("Summit Roofing is running 4 ad(s)"));
        assert!(text.contains("Peak Exteriors"));
        assert!(text.contains("Missing CTAs: Book Now."));
    }

    #[test]
    fn fallback_narrative_without_gaps() {
        let text = fallback_narrative(&BrandProfile::empty("Summit"), &GapSet::default());
        assert!(text.ends_with("No consensus gaps were detected."));
    }
}
