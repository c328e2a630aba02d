//! Brand relevance decisions for individual lines.

use cupofdata_core::KeywordDictionary;

use crate::capability::{Capabilities, Capability};

/// Where a line came from; titles get a cheaper path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Body,
    Reply,
}

/// Outcome of one relevance decision, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Title naming the brand.
    TitleMatch,
    /// Only a generic category word, no brand, no specific drink.
    CategoryOnly,
    /// The classifier said yes or no.
    Classified(bool),
    /// The classifier failed; the line is dropped.
    ClassifierFailed,
    /// Keyword containment, used when no classifier is configured.
    Keyword(bool),
}

impl Verdict {
    #[must_use]
    pub fn keep(self) -> bool {
        match self {
            Verdict::TitleMatch => true,
            Verdict::CategoryOnly | Verdict::ClassifierFailed => false,
            Verdict::Classified(keep) | Verdict::Keyword(keep) => keep,
        }
    }
}

/// Decides whether a line is about one target brand.
///
/// Fails closed: a classifier error drops the line rather than letting
/// unrelated text into the brand's statistics.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    brand: String,
    brand_key: String,
    dictionary: KeywordDictionary,
}

impl RelevanceFilter {
    #[must_use]
    pub fn new(brand: &str, dictionary: KeywordDictionary) -> Self {
        Self {
            brand: brand.trim().to_string(),
            brand_key: match_key(brand),
            dictionary,
        }
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Whitespace- and case-insensitive containment of the brand name.
    #[must_use]
    pub fn mentions_brand(&self, text: &str) -> bool {
        !self.brand_key.is_empty() && match_key(text).contains(&self.brand_key)
    }

    /// Cheap rejection before any classifier call.
    #[must_use]
    pub fn is_category_only(&self, line: &str) -> bool {
        !self.mentions_brand(line)
            && self.dictionary.mentions_category(line)
            && !self.dictionary.mentions_any_drink(line)
    }

    /// Decide one line.
    pub async fn judge(&self, line: &str, kind: LineKind, caps: &Capabilities) -> Verdict {
        if kind == LineKind::Title && self.mentions_brand(line) {
            return Verdict::TitleMatch;
        }
        if self.is_category_only(line) {
            return Verdict::CategoryOnly;
        }

        let Some(classifier) = &caps.relevance else {
            return Verdict::Keyword(self.mentions_brand(line));
        };

        match caps
            .call(Capability::Relevance, classifier.is_relevant(&self.brand, line))
            .await
        {
            Ok(keep) => Verdict::Classified(keep),
            Err(e) => {
                tracing::warn!(
                    brand = %self.brand,
                    error = %e,
                    "relevance check failed; dropping line"
                );
                Verdict::ClassifierFailed
            }
        }
    }

    pub async fn is_relevant(&self, line: &str, kind: LineKind, caps: &Capabilities) -> bool {
        self.judge(line, kind, caps).await.keep()
    }
}

/// Whether `line` expresses an opinion about a drink.
///
/// Fails open: without a classifier, or when it errors, the line is kept.
pub async fn passes_opinion_gate(line: &str, caps: &Capabilities) -> bool {
    let Some(classifier) = &caps.opinion else {
        return true;
    };
    match caps
        .call(Capability::Opinion, classifier.is_opinion(line))
        .await
    {
        Ok(keep) => keep,
        Err(e) => {
            tracing::warn!(error = %e, "opinion check failed; keeping line");
            true
        }
    }
}

fn match_key(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
