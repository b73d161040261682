//! Gap-analysis orchestration.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use adgap_core::{
    AdCreative, AnalysisConfig, AnalysisResult, BrandProfile, CompetitorEntity, Recommendation,
    COMPETITOR_COUNT,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::classifier::Classifier;
use crate::error::EngineError;
use crate::gaps::compute_gaps;
use crate::market::synthesize;
use crate::prompt::build_recommendation_prompt;
use crate::recommendations::{
    fallback_narrative, fallback_recommendation, validate_recommendations,
};
use crate::services::{
    AdLink, AdSource, AnalysisStore, ClassificationService, RecommendationService,
};

/// Split `brands` into the subject and exactly five competitors, preserving
/// input order among competitors.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCompetitorSet`] unless the input holds
/// exactly one subject and [`COMPETITOR_COUNT`] competitors.
pub fn validate_competitor_set(
    brands: &[CompetitorEntity],
) -> Result<(&CompetitorEntity, [&CompetitorEntity; COMPETITOR_COUNT]), EngineError> {
    let subjects: Vec<&CompetitorEntity> = brands.iter().filter(|b| b.is_subject).collect();
    let competitors: Vec<&CompetitorEntity> = brands.iter().filter(|b| !b.is_subject).collect();

    let invalid = || EngineError::InvalidCompetitorSet {
        subjects: subjects.len(),
        competitors: competitors.len(),
    };

    let [subject] = subjects.as_slice() else {
        return Err(invalid());
    };
    let competitors: [&CompetitorEntity; COMPETITOR_COUNT] =
        competitors.as_slice().try_into().map_err(|_| invalid())?;
    Ok((*subject, competitors))
}

/// Runs one analysis end to end against its collaborators.
///
/// Only invalid input and an empty subject retrieval fail the run, along with
/// failure to store the finished result. Competitor retrieval, classification,
/// recommendation and per-ad linkage failures degrade the result instead.
pub struct Orchestrator {
    config: AnalysisConfig,
    source: Arc<dyn AdSource>,
    classifier: Arc<dyn ClassificationService>,
    recommender: Arc<dyn RecommendationService>,
    store: Arc<dyn AnalysisStore>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        config: AnalysisConfig,
        source: Arc<dyn AdSource>,
        classifier: Arc<dyn ClassificationService>,
        recommender: Arc<dyn RecommendationService>,
        store: Arc<dyn AnalysisStore>,
    ) -> Self {
        Self {
            config,
            source,
            classifier,
            recommender,
            store,
        }
    }

    /// Validate, retrieve, classify, aggregate, compare, recommend and
    /// persist.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidCompetitorSet`] for anything other than one
    ///   subject and five competitors.
    /// - [`EngineError::NoSubjectAds`] when the subject's retrieval fails or
    ///   returns nothing. Nothing is persisted.
    /// - Any error from [`AnalysisStore::store`].
    pub async fn run(&self, brands: &[CompetitorEntity]) -> Result<AnalysisResult, EngineError> {
        let (subject, competitors) = validate_competitor_set(brands)?;
        let mut warnings: Vec<String> = Vec::new();

        // Slot 0 is the subject; slots 1..=5 follow competitor input order.
        let ordered: Vec<&CompetitorEntity> =
            std::iter::once(subject).chain(competitors).collect();

        tracing::info!(subject = %subject.name, "starting gap analysis");

        let retrieved: Vec<Vec<AdCreative>> = stream::iter(ordered.iter().copied())
            .map(|brand| self.retrieve_isolated(brand))
            .buffered(self.config.retrieval_workers())
            .collect()
            .await;

        if retrieved[0].is_empty() {
            tracing::error!(subject = %subject.name, "no ads retrieved for subject");
            return Err(EngineError::NoSubjectAds {
                brand: subject.name.clone(),
            });
        }

        let competitors_with_ads = retrieved[1..].iter().filter(|ads| !ads.is_empty()).count();
        if competitors_with_ads < self.config.min_competitors_with_ads {
            tracing::warn!(
                competitors_with_ads,
                minimum = self.config.min_competitors_with_ads,
                "few competitors returned ads; gap analysis will be thin"
            );
            warnings.push(format!(
                "only {competitors_with_ads} of {COMPETITOR_COUNT} competitors returned ads"
            ));
        }
        for (brand, ads) in ordered[1..].iter().zip(&retrieved[1..]) {
            if ads.is_empty() {
                warnings.push(format!("no ads retrieved for competitor {}", brand.name));
            }
        }

        let mut ranges: Vec<Range<usize>> = Vec::with_capacity(ordered.len());
        let mut offset = 0;
        for ads in &retrieved {
            ranges.push(offset..offset + ads.len());
            offset += ads.len();
        }
        let creatives: Vec<AdCreative> = retrieved.into_iter().flatten().collect();

        let outcome = Classifier::new(self.classifier.as_ref(), &self.config)
            .classify(&creatives)
            .await;
        if outcome.fallback_count > 0 {
            warnings.push(format!(
                "{} of {} creatives used fallback classification",
                outcome.fallback_count,
                creatives.len()
            ));
        }
        let classifications = &outcome.classifications;

        let subject_profile = aggregate(
            &subject.name,
            &creatives[ranges[0].clone()],
            &classifications[ranges[0].clone()],
        );
        let competitor_profiles: [BrandProfile; COMPETITOR_COUNT] = std::array::from_fn(|i| {
            let range = ranges[i + 1].clone();
            aggregate(
                &competitors[i].name,
                &creatives[range.clone()],
                &classifications[range],
            )
        });

        let gaps = compute_gaps(&subject_profile, &competitor_profiles);
        let market_insights = synthesize(&competitor_profiles);

        let prompt = build_recommendation_prompt(
            &subject_profile,
            &competitor_profiles,
            &gaps,
            &market_insights,
        );
        let (recommendations, narrative) = match self.request_recommendations(&prompt).await {
            Some((recs, narrative)) => (
                recs,
                narrative.unwrap_or_else(|| fallback_narrative(&subject_profile, &gaps)),
            ),
            None => {
                warnings.push("recommendation service unavailable; fallback used".to_string());
                (
                    vec![fallback_recommendation(&gaps)],
                    fallback_narrative(&subject_profile, &gaps),
                )
            }
        };

        let result = AnalysisResult {
            analysis_id: Uuid::new_v4(),
            created_at: Utc::now(),
            subject: subject_profile,
            competitors: competitor_profiles,
            gaps,
            recommendations,
            market_insights,
            narrative,
            warnings,
        };

        let analysis_id = self.store.store(&result).await.map_err(|e| {
            tracing::error!(analysis_id = %result.analysis_id, error = %e, "failed to store analysis");
            e
        })?;

        let mut linked = 0usize;
        let mut skipped = 0usize;
        for (slot, brand) in ordered.iter().enumerate() {
            let range = ranges[slot].clone();
            for (creative, classification) in
                creatives[range.clone()].iter().zip(&classifications[range])
            {
                let link = AdLink {
                    brand_name: &brand.name,
                    is_subject: slot == 0,
                    creative,
                    classification,
                };
                match self.store.link_ad(analysis_id, &link).await {
                    Ok(()) => linked += 1,
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(
                            %analysis_id,
                            brand = %brand.name,
                            creative_id = %creative.id,
                            error = %e,
                            "failed to link ad to analysis; skipping"
                        );
                    }
                }
            }
        }

        tracing::info!(
            %analysis_id,
            subject = %result.subject.name,
            linked,
            skipped,
            recommendations = result.recommendations.len(),
            "gap analysis complete"
        );
        Ok(result)
    }

    /// Retrieval with per-brand deadline. Failures and timeouts yield an
    /// empty list; duplicate creative ids are dropped.
    async fn retrieve_isolated(&self, brand: &CompetitorEntity) -> Vec<AdCreative> {
        let timeout = self.config.retrieval_timeout();
        let call = self
            .source
            .retrieve(brand, self.config.max_ads_per_brand, self.config.days_back);

        let ads = match tokio::time::timeout(timeout, call)
            .await
            .unwrap_or_else(|_| Err(EngineError::timeout("retrieval", timeout)))
        {
            Ok(ads) => ads,
            Err(e) => {
                tracing::warn!(brand = %brand.name, error = %e, "retrieval failed");
                return Vec::new();
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        let ads: Vec<AdCreative> = ads
            .into_iter()
            .filter(|ad| seen.insert(ad.id.clone()))
            .take(self.config.max_ads_per_brand)
            .collect();

        if ads.is_empty() {
            tracing::warn!(brand = %brand.name, "no ads retrieved");
        } else {
            tracing::info!(brand = %brand.name, ads = ads.len(), "retrieved ads");
        }
        ads
    }

    /// `None` when the service failed, timed out or returned nothing usable.
    /// The narrative is `None` when the service left it blank.
    async fn request_recommendations(
        &self,
        prompt: &str,
    ) -> Option<(Vec<Recommendation>, Option<String>)> {
        let timeout = self.config.recommend_timeout();
        let response = match tokio::time::timeout(timeout, self.recommender.recommend(prompt))
            .await
            .unwrap_or_else(|_| Err(EngineError::timeout("recommendation", timeout)))
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "recommendation service failed; using fallback");
                return None;
            }
        };

        let recommendations =
            validate_recommendations(response.recommendations, self.config.max_recommendations);
        if recommendations.is_empty() {
            tracing::warn!("recommendation service returned no usable recommendations");
            return None;
        }

        let narrative = response.narrative.trim();
        Some((
            recommendations,
            (!narrative.is_empty()).then(|| narrative.to_string()),
        ))
    }
}
