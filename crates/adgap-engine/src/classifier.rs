//! Batch classification of creatives with deterministic fallback.

use adgap_core::classification::UNKNOWN_CTA;
use adgap_core::{push_unique, AdClassification, AdCreative, AdLength, AnalysisConfig, HookType, Tone};
use futures::stream::{self, StreamExt};

use crate::error::EngineError;
use crate::services::{ClassificationItem, ClassificationService};

/// Classifications in input order, plus how many had to fall back.
#[derive(Debug, Default)]
pub struct ClassificationOutcome {
    /// One entry per input creative, at the creative's position. Creative
    /// ids play no part, so equal ids from different brands stay distinct.
    pub classifications: Vec<AdClassification>,
    /// Creatives classified by [`AdClassification::fallback`].
    pub fallback_count: usize,
    /// Batches whose service call failed or timed out.
    pub failed_batches: usize,
}

/// Splits creatives into batches and classifies them through a
/// [`ClassificationService`]. Never fails: every creative gets a
/// classification.
pub struct Classifier<'a> {
    service: &'a dyn ClassificationService,
    config: &'a AnalysisConfig,
}

struct BatchOutcome {
    classified: Vec<AdClassification>,
    fallback_count: usize,
    failed: bool,
}

impl<'a> Classifier<'a> {
    #[must_use]
    pub fn new(service: &'a dyn ClassificationService, config: &'a AnalysisConfig) -> Self {
        Self { service, config }
    }

    /// Classify every creative. Batches run with at most
    /// [`AnalysisConfig::classify_workers`] in flight.
    pub async fn classify(&self, creatives: &[AdCreative]) -> ClassificationOutcome {
        if creatives.is_empty() {
            return ClassificationOutcome::default();
        }

        let batch_size = self.config.batch_size();
        let batches: Vec<BatchOutcome> = stream::iter(creatives.chunks(batch_size).enumerate())
            .map(|(batch_index, batch)| self.classify_batch(batch_index, batch))
            .buffered(self.config.classify_workers())
            .collect()
            .await;

        let mut outcome = ClassificationOutcome {
            classifications: Vec::with_capacity(creatives.len()),
            ..ClassificationOutcome::default()
        };
        for batch in batches {
            outcome.fallback_count += batch.fallback_count;
            if batch.failed {
                outcome.failed_batches += 1;
            }
            outcome.classifications.extend(batch.classified);
        }

        tracing::info!(
            creatives = creatives.len(),
            fallbacks = outcome.fallback_count,
            failed_batches = outcome.failed_batches,
            "classification complete"
        );
        outcome
    }

    async fn classify_batch(&self, batch_index: usize, batch: &[AdCreative]) -> BatchOutcome {
        let timeout = self.config.classify_timeout();
        let items = match tokio::time::timeout(timeout, self.service.classify_batch(batch))
            .await
            .unwrap_or_else(|_| Err(EngineError::timeout("classification batch", timeout)))
        {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(
                    batch = batch_index,
                    size = batch.len(),
                    error = %e,
                    "classification batch failed; using fallback"
                );
                None
            }
        };

        let failed = items.is_none();
        let mut slots: Vec<Option<AdClassification>> = vec![None; batch.len()];
        for item in items.unwrap_or_default() {
            let index = item.index;
            match (batch.get(index), slots.get_mut(index)) {
                (Some(creative), Some(slot)) if slot.is_none() => {
                    *slot = Some(from_item(item, creative));
                }
                (Some(_), Some(_)) => {
                    tracing::debug!(batch = batch_index, index, "duplicate classification item");
                }
                _ => {
                    tracing::debug!(
                        batch = batch_index,
                        index,
                        "classification item index out of range"
                    );
                }
            }
        }

        let mut fallback_count = 0;
        let classified: Vec<AdClassification> = batch
            .iter()
            .zip(slots)
            .map(|(creative, slot)| {
                slot.unwrap_or_else(|| {
                    fallback_count += 1;
                    AdClassification::fallback(creative)
                })
            })
            .collect();

        if fallback_count > 0 && !failed {
            tracing::debug!(
                batch = batch_index,
                missing = fallback_count,
                "classification response omitted creatives"
            );
        }

        BatchOutcome {
            classified,
            fallback_count,
            failed,
        }
    }
}

/// Validate one service item against the closed sets, falling back field by
/// field. Ad length is always backstopped from the creative's text.
fn from_item(item: ClassificationItem, creative: &AdCreative) -> AdClassification {
    let fallback = AdClassification::fallback(creative);

    let mut trust_signals = Vec::new();
    for signal in &item.trust_signals {
        push_unique(&mut trust_signals, signal);
    }

    AdClassification {
        hook_type: item
            .hook_type
            .as_deref()
            .and_then(HookType::parse)
            .unwrap_or(fallback.hook_type),
        headline: non_blank(item.headline).unwrap_or(fallback.headline),
        cta: non_blank(item.cta).unwrap_or_else(|| UNKNOWN_CTA.to_string()),
        offer: non_blank(item.offer),
        pain_point: non_blank(item.pain_point),
        audience_signals: item
            .audience_signals
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        tone: item
            .tone
            .as_deref()
            .and_then(Tone::parse)
            .unwrap_or(fallback.tone),
        ad_length: item
            .ad_length
            .as_deref()
            .and_then(AdLength::parse)
            .unwrap_or_else(|| AdLength::from_text(&creative.text)),
        trust_signals,
        unique_selling_point: non_blank(item.unique_selling_point),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
