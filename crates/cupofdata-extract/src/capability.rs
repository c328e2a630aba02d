//! Contracts for the external collaborators the pipeline consumes.
//!
//! Every call crosses one of these traits, and every call is wrapped by
//! [`guarded`] so a slow service becomes a [`ClassifierError::Timeout`]
//! instead of stalling the run.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cupofdata_core::{Document, DrinkStat, Segment};

use crate::error::{ClassifierError, SourceError};

/// Default per-call timeout when the caller does not configure one.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(20);

/// Names of the external capabilities, used in logs, errors and hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ContentSource,
    EntityExtraction,
    Relevance,
    Segmentation,
    Opinion,
    Summary,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ContentSource => write!(f, "content source"),
            Capability::EntityExtraction => write!(f, "entity extractor"),
            Capability::Relevance => write!(f, "relevance classifier"),
            Capability::Segmentation => write!(f, "segmenter"),
            Capability::Opinion => write!(f, "opinion classifier"),
            Capability::Summary => write!(f, "prose summarizer"),
        }
    }
}

/// Suggests drink names found in free text.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract_drinks(&self, text: &str) -> Result<Vec<String>, ClassifierError>;
}

/// Decides whether `text` talks about `brand`.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn is_relevant(&self, brand: &str, text: &str) -> Result<bool, ClassifierError>;
}

/// Splits free text into `{brand, content}` pairs.
#[async_trait]
pub trait Segmenter: Send + Sync {
    async fn segment(&self, text: &str) -> Result<Vec<Segment>, ClassifierError>;
}

/// Decides whether a line evaluates or recommends a drink rather than stating facts.
#[async_trait]
pub trait OpinionClassifier: Send + Sync {
    async fn is_opinion(&self, text: &str) -> Result<bool, ClassifierError>;
}

/// Writes a short prose summary of the ranked drinks.
#[async_trait]
pub trait ProseSummarizer: Send + Sync {
    async fn summarize(&self, brand: &str, stats: &[DrinkStat]) -> Result<String, ClassifierError>;
}

/// Yields documents by identifier.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Document, SourceError>;
}

/// Caller hooks invoked before each external call, e.g. to enforce pacing.
#[async_trait]
pub trait PipelineHooks: Send + Sync {
    async fn before_call(&self, _capability: Capability) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

#[async_trait]
impl PipelineHooks for NoHooks {}

/// Fixed minimum delay before every external call.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl PipelineHooks for FixedDelay {
    async fn before_call(&self, capability: Capability) {
        if !self.0.is_zero() {
            tracing::trace!(%capability, delay_ms = self.0.as_millis(), "pacing external call");
            tokio::time::sleep(self.0).await;
        }
    }
}

/// The optional classifier services injected into one pipeline.
///
/// Any capability left as `None` is treated as unavailable and its
/// component runs on its deterministic path.
#[derive(Clone)]
pub struct Capabilities {
    pub entity_extractor: Option<Arc<dyn EntityExtractor>>,
    pub relevance: Option<Arc<dyn RelevanceClassifier>>,
    pub segmenter: Option<Arc<dyn Segmenter>>,
    pub opinion: Option<Arc<dyn OpinionClassifier>>,
    pub summarizer: Option<Arc<dyn ProseSummarizer>>,
    pub hooks: Arc<dyn PipelineHooks>,
    pub call_timeout: Duration,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}

impl Capabilities {
    /// No classifier services: rule-based extraction and keyword relevance only.
    #[must_use]
    pub fn none() -> Self {
        Self {
            entity_extractor: None,
            relevance: None,
            segmenter: None,
            opinion: None,
            summarizer: None,
            hooks: Arc::new(NoHooks),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Run one external call through the hooks and the timeout guard.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or [`ClassifierError::Timeout`] when it
    /// does not finish within `call_timeout`.
    pub async fn call<T, Fut>(&self, capability: Capability, fut: Fut) -> Result<T, ClassifierError>
    where
        Fut: Future<Output = Result<T, ClassifierError>>,
    {
        self.hooks.before_call(capability).await;
        guarded(capability, self.call_timeout, fut).await
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("entity_extractor", &self.entity_extractor.is_some())
            .field("relevance", &self.relevance.is_some())
            .field("segmenter", &self.segmenter.is_some())
            .field("opinion", &self.opinion.is_some())
            .field("summarizer", &self.summarizer.is_some())
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

/// Await `fut` for at most `timeout`.
///
/// # Errors
///
/// Returns [`ClassifierError::Timeout`] on elapse, otherwise the future's own result.
pub async fn guarded<T, Fut>(
    capability: Capability,
    timeout: Duration,
    fut: Fut,
) -> Result<T, ClassifierError>
where
    Fut: Future<Output = Result<T, ClassifierError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClassifierError::Timeout {
            capability,
            after: timeout,
        }),
    }
}
