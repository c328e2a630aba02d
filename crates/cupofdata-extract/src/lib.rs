//! Extraction, segmentation and aggregation pipeline for CupOfData.
//!
//! Turns forum posts into a ranked per-brand drink recommendation. Rule-based
//! dictionary matching is always available; classifier services plug in via
//! the traits in [`capability`] and degrade to documented fallbacks when they
//! fail or time out.

pub mod aggregator;
pub mod capability;
pub mod error;
pub mod hybrid;
pub mod pipeline;
pub mod relevance;
pub mod rule;
pub mod segmenter;
pub mod splitter;
pub mod summary;

pub use aggregator::{build_recommendation, RecommendationAggregator};
pub use capability::{
    Capabilities, Capability, ContentSource, EntityExtractor, FixedDelay, NoHooks,
    OpinionClassifier, PipelineHooks, ProseSummarizer, RelevanceClassifier, Segmenter,
};
pub use error::{ClassifierError, SourceError};
pub use hybrid::HybridExtractor;
pub use pipeline::{AnalysisReport, BrandPipeline, PipelineOptions};
pub use relevance::{LineKind, RelevanceFilter};
pub use rule::RuleExtractor;
pub use segmenter::BrandSegmenter;
pub use splitter::split_sentences;
pub use summary::{compose_lines, format_drink_label};
