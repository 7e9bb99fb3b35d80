//! Aircraft AD-applicability analysis
//!
//! Ties the pipeline together: candidate lookup and ranking, then per-AD
//! fetch, extraction and classification run concurrently, then risk
//! aggregation once every AD has settled.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::model::{
    AdCandidate, AdResult, AircraftIdentity, AnalysisRequest, AnalysisResult, RiskLevel, Verdict,
};
use crate::retriever::DocumentFetcher;
use crate::service::catalog::DirectiveCatalog;
use crate::service::classifier::{ClassificationContext, ClassifierChain};
use crate::service::extraction::TextExtractor;
use crate::service::ranking::{dedupe_candidates, model_variants, rank};
use crate::service::risk::aggregate;

pub struct AnalysisService {
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: TextExtractor,
    classifier: ClassifierChain,
    catalog: Option<Arc<dyn DirectiveCatalog>>,
}

impl AnalysisService {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: TextExtractor,
        classifier: ClassifierChain,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            classifier,
            catalog: None,
        }
    }

    /// Look up additional candidates by model name variants
    pub fn with_catalog(mut self, catalog: Arc<dyn DirectiveCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Run the full analysis for one aircraft. Never fails; degraded
    /// inputs produce low-confidence verdicts.
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult {
        let start_time = Instant::now();
        let identity = request.resolve_identity();

        let matched = self.collect_candidates(&identity, request.candidates.clone()).await;
        let total_ads_matched = matched.len() as u32;
        let ranked = rank(matched);

        let verdicts = self.classify_candidates(&identity, &ranked).await;

        let defects = request.resolve_defects();
        let risk = aggregate(&verdicts, &defects);
        let applicable_count = verdicts.iter().filter(|v| v.applicable).count() as u32;

        let ads: Vec<AdResult> = ranked
            .into_iter()
            .zip(verdicts)
            .map(|(candidate, verdict)| AdResult::new(candidate, verdict))
            .collect();

        tracing::info!(
            tail = %request.tail_number,
            serial = %identity.serial_number,
            model = %identity.model,
            ads_matched = total_ads_matched,
            ads_analyzed = ads.len(),
            applicable = applicable_count,
            risk_score = risk.total,
            elapsed_ms = start_time.elapsed().as_millis(),
            "Aircraft analysis complete"
        );

        AnalysisResult {
            tail_number: request.tail_number,
            match_type: request.match_type,
            registry: request.registry,
            identity,
            count: defects.report_count,
            top_failures: defects.top_failures.clone(),
            ads,
            risk,
            risk_score: risk.total,
            risk_level: RiskLevel::from_score(risk.total),
            failed_count: defects.failed_count(),
            excess_wear_count: defects.excess_wear_count(),
            applicable_count,
            total_ads_matched,
        }
    }

    /// Supplied candidates followed by catalog matches, deduplicated
    async fn collect_candidates(
        &self,
        identity: &AircraftIdentity,
        mut candidates: Vec<AdCandidate>,
    ) -> Vec<AdCandidate> {
        if let Some(catalog) = &self.catalog {
            let variants = model_variants(&identity.model);
            if !variants.is_empty() {
                candidates.extend(catalog.find_by_models(&variants).await);
            }
        }
        dedupe_candidates(candidates)
    }

    /// One verdict per ranked candidate, in candidate order
    async fn classify_candidates(
        &self,
        identity: &AircraftIdentity,
        ranked: &[AdCandidate],
    ) -> Vec<Verdict> {
        if !identity.has_known_serial() {
            tracing::info!(
                model = %identity.model,
                ads = ranked.len(),
                "Serial number unavailable, marking ADs for manual review"
            );
            return ranked.iter().map(|_| Verdict::manual_review()).collect();
        }

        // join_all yields results in input order regardless of completion order
        join_all(
            ranked
                .iter()
                .map(|candidate| self.classify_candidate(identity, candidate)),
        )
        .await
    }

    async fn classify_candidate(
        &self,
        identity: &AircraftIdentity,
        candidate: &AdCandidate,
    ) -> Verdict {
        let raw = match candidate.document_link.as_deref().map(str::trim) {
            Some(link) if !link.is_empty() => self.fetcher.fetch(link).await,
            _ => String::new(),
        };

        let text = self.extractor.extract(&raw);

        tracing::debug!(
            ad = %candidate.ad_number,
            raw_length = raw.len(),
            text_length = text.chars().count(),
            "Extracted applicability text"
        );

        let ctx = ClassificationContext {
            serial_number: &identity.serial_number,
            model: &identity.model,
            ad_number: &candidate.ad_number,
            text: &text,
        };

        self.classifier.classify(&ctx).await
    }
}
