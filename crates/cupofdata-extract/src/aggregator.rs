//! Per-brand aggregation of drink mentions across documents.

use std::collections::HashMap;

use cupofdata_core::{DrinkStat, Mention, Recommendation};

use crate::rule::RuleExtractor;
use crate::summary::{primary_sentence, secondary_sentences};

/// Number of drinks kept in [`Recommendation::ranked_stats`].
pub const TOP_N: usize = 3;

/// Folds per-document mention lists into ranked drink statistics.
///
/// Each document contributes at most one count per drink but every modifier
/// vote. Ties in the final ranking keep the order in which drinks were first seen.
#[derive(Debug, Clone)]
pub struct RecommendationAggregator {
    brand: String,
    stats: Vec<DrinkStat>,
    index: HashMap<String, usize>,
    total_mentions: usize,
    documents: usize,
}

impl RecommendationAggregator {
    #[must_use]
    pub fn new(brand: &str) -> Self {
        Self {
            brand: brand.to_string(),
            stats: Vec::new(),
            index: HashMap::new(),
            total_mentions: 0,
            documents: 0,
        }
    }

    /// Fold one document's mentions in.
    ///
    /// A drink's `mention_count` grows by at most one per document, while
    /// every mention in the document casts its sugar and ice votes.
    pub fn add_document(&mut self, mentions: &[Mention]) {
        self.documents += 1;
        self.total_mentions += mentions.len();

        let mut counted: Vec<&str> = Vec::new();
        for mention in mentions {
            let idx = match self.index.get(&mention.drink) {
                Some(&idx) => idx,
                None => {
                    self.stats.push(DrinkStat::new(mention.drink.clone()));
                    self.index.insert(mention.drink.clone(), self.stats.len() - 1);
                    self.stats.len() - 1
                }
            };
            let stat = &mut self.stats[idx];
            if !counted.contains(&mention.drink.as_str()) {
                counted.push(&mention.drink);
                stat.mention_count += 1;
            }
            if let Some(sugar) = &mention.sugar {
                stat.vote_sugar(sugar);
            }
            if let Some(ice) = &mention.ice {
                stat.vote_ice(ice);
            }
        }
    }

    #[must_use]
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// All drinks seen so far, descending by count, stable on first-seen order.
    #[must_use]
    pub fn ranked(&self) -> Vec<DrinkStat> {
        let mut ranked = self.stats.clone();
        ranked.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
        ranked
    }

    #[must_use]
    pub fn finish(self) -> Recommendation {
        let mut ranked_stats = self.ranked();
        ranked_stats.truncate(TOP_N);

        tracing::debug!(
            brand = %self.brand,
            documents = self.documents,
            distinct_drinks = self.stats.len(),
            total_mentions = self.total_mentions,
            "aggregation finished"
        );

        Recommendation {
            primary_sentence: primary_sentence(&self.brand, &ranked_stats),
            secondary_sentences: secondary_sentences(&ranked_stats),
            brand: self.brand,
            total_mentions: self.total_mentions,
            ranked_stats,
        }
    }
}

/// Rule-only recommendation: each text is one document, split into sentences.
#[must_use]
pub fn build_recommendation<S: AsRef<str>>(
    brand: &str,
    texts: &[S],
    rule: &RuleExtractor,
) -> Recommendation {
    let mut aggregator = RecommendationAggregator::new(brand);
    for text in texts {
        aggregator.add_document(&rule.extract_text(text.as_ref()));
    }
    aggregator.finish()
}
