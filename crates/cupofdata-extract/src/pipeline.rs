//! Document-to-recommendation orchestration.

use cupofdata_core::{Document, KeywordDictionary, Mention, Recommendation};

use crate::aggregator::RecommendationAggregator;
use crate::capability::{Capabilities, Capability, ContentSource};
use crate::hybrid::HybridExtractor;
use crate::relevance::{passes_opinion_gate, LineKind, RelevanceFilter};
use crate::rule::RuleExtractor;
use crate::segmenter::BrandSegmenter;
use crate::splitter::split_sentences;
use crate::summary::summarize_with;

/// Shortest header label accepted as a partial brand name, e.g. `五十` for `五十嵐`.
const MIN_PARTIAL_LABEL_CHARS: usize = 2;

/// Options that shape one analysis run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub dictionary: KeywordDictionary,
    /// Brand names for the known-brand segmentation strategy.
    pub known_brands: Vec<String>,
}

/// Final output of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub recommendation: Recommendation,
    /// Prose summary, or a placeholder when the summarizer is unavailable.
    pub prose_summary: String,
    pub documents_processed: usize,
    pub documents_skipped: usize,
}

/// Runs segmentation, relevance filtering, extraction and aggregation for one brand.
///
/// Documents are handled strictly one at a time, in the order given, so
/// classifier calls happen in a deterministic sequence.
pub struct BrandPipeline {
    brand: String,
    segmenter: BrandSegmenter,
    relevance: RelevanceFilter,
    extractor: HybridExtractor,
    caps: Capabilities,
}

impl BrandPipeline {
    #[must_use]
    pub fn new(brand: &str, options: PipelineOptions, caps: Capabilities) -> Self {
        let brand = brand.trim().to_string();
        Self {
            segmenter: BrandSegmenter::new(options.known_brands),
            relevance: RelevanceFilter::new(&brand, options.dictionary.clone()),
            extractor: HybridExtractor::new(RuleExtractor::new(options.dictionary)),
            caps,
            brand,
        }
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// The text of `doc` that is about the target brand, one kept piece per line.
    pub async fn relevant_text(&self, doc: &Document) -> String {
        let mut kept: Vec<String> = Vec::new();

        let title = doc.title.trim();
        if !title.is_empty()
            && self
                .relevance
                .is_relevant(title, LineKind::Title, &self.caps)
                .await
        {
            kept.push(title.to_string());
        }

        for segment in self.segmenter.segment(&doc.body, &self.caps).await {
            if segment.is_unknown() {
                for line in split_sentences(&segment.content) {
                    if self.keep_line(line, LineKind::Body).await {
                        kept.push(line.to_string());
                    }
                }
            } else if self.is_target_label(&segment.brand) {
                tracing::debug!(doc = %doc.id, label = %segment.brand, "keeping brand segment");
                kept.push(segment.content);
            } else {
                tracing::debug!(
                    doc = %doc.id,
                    label = %segment.brand,
                    "skipping other brand segment"
                );
            }
        }

        for reply in &doc.replies {
            let reply = reply.trim();
            if !reply.is_empty() && self.keep_line(reply, LineKind::Reply).await {
                kept.push(reply.to_string());
            }
        }

        kept.join("\n")
    }

    /// Mentions contributed by one document, before per-document dedup.
    ///
    /// One mention per sentence that names a drink, so repeated drinks keep
    /// every sugar and ice vote. Drinks found only by the whole-text scan or
    /// the entity extractor are appended once each.
    pub async fn document_mentions(&self, doc: &Document) -> Vec<Mention> {
        let block = self.relevant_text(doc).await;
        if block.trim().is_empty() {
            tracing::debug!(doc = %doc.id, "no relevant text");
            return Vec::new();
        }

        let mut mentions = self.extractor.rule().extract_text(&block);
        for mention in self.extractor.extract(&block, &self.caps).await {
            if !mentions.iter().any(|m| m.drink == mention.drink) {
                mentions.push(mention);
            }
        }
        mentions
    }

    /// Analyse documents that are already in memory.
    pub async fn analyze(&self, documents: &[Document]) -> AnalysisReport {
        let mut aggregator = RecommendationAggregator::new(&self.brand);
        for (i, doc) in documents.iter().enumerate() {
            let mentions = self.document_mentions(doc).await;
            tracing::info!(
                brand = %self.brand,
                doc = %doc.id,
                position = i + 1,
                total = documents.len(),
                mentions = mentions.len(),
                "document analysed"
            );
            aggregator.add_document(&mentions);
        }
        self.finish(aggregator, 0).await
    }

    /// Fetch each id from `source` and analyse it; unavailable documents are skipped.
    pub async fn analyze_from_source<S: AsRef<str>>(
        &self,
        source: &dyn ContentSource,
        ids: &[S],
    ) -> AnalysisReport {
        let mut aggregator = RecommendationAggregator::new(&self.brand);
        let mut skipped = 0;

        for (i, id) in ids.iter().enumerate() {
            let id = id.as_ref();
            self.caps.hooks.before_call(Capability::ContentSource).await;
            let doc = match source.fetch(id).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(
                        position = i + 1,
                        total = ids.len(),
                        error = %e,
                        "document unavailable; skipping"
                    );
                    skipped += 1;
                    continue;
                }
            };

            let mentions = self.document_mentions(&doc).await;
            tracing::info!(
                brand = %self.brand,
                title = %doc.title,
                position = i + 1,
                total = ids.len(),
                mentions = mentions.len(),
                "document analysed"
            );
            aggregator.add_document(&mentions);
        }

        self.finish(aggregator, skipped).await
    }

    async fn finish(&self, aggregator: RecommendationAggregator, skipped: usize) -> AnalysisReport {
        let documents_processed = aggregator.documents();
        let recommendation = aggregator.finish();
        let prose_summary =
            summarize_with(&self.brand, &recommendation.ranked_stats, &self.caps).await;
        AnalysisReport {
            recommendation,
            prose_summary,
            documents_processed,
            documents_skipped: skipped,
        }
    }

    async fn keep_line(&self, line: &str, kind: LineKind) -> bool {
        self.relevance.is_relevant(line, kind, &self.caps).await
            && passes_opinion_gate(line, &self.caps).await
    }

    /// A header label names the target when it equals the brand, contains it,
    /// or is a piece of it at least two characters long.
    fn is_target_label(&self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        label.contains(&self.brand)
            || (label.chars().count() >= MIN_PARTIAL_LABEL_CHARS && self.brand.contains(label))
    }
}
