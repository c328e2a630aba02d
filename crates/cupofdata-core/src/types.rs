use serde::{Deserialize, Serialize};

/// Brand label for text that could not be attributed to any brand.
pub const UNKNOWN_BRAND: &str = "unknown";

/// Maximum number of characters kept in a [`Mention::snippet`].
pub const SNIPPET_MAX_CHARS: usize = 80;

/// One forum post with its replies, as yielded by a content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Article URL or another opaque key.
    pub id: String,
    pub title: String,
    pub body: String,
    /// Reply texts in thread order.
    #[serde(default)]
    pub replies: Vec<String>,
}

/// A contiguous span of a document attributed to one brand label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Exact brand string, or [`UNKNOWN_BRAND`].
    pub brand: String,
    pub content: String,
}

impl Segment {
    #[must_use]
    pub fn new(brand: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn unknown(content: impl Into<String>) -> Self {
        Self::new(UNKNOWN_BRAND, content)
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.brand == UNKNOWN_BRAND
    }
}

/// A single observed drink, with optional sweetness and ice modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub drink: String,
    pub sugar: Option<String>,
    pub ice: Option<String>,
    /// Excerpt of at most [`SNIPPET_MAX_CHARS`] characters.
    pub snippet: String,
}

impl Mention {
    #[must_use]
    pub fn new(
        drink: impl Into<String>,
        sugar: Option<String>,
        ice: Option<String>,
        source_text: &str,
    ) -> Self {
        Self {
            drink: drink.into(),
            sugar,
            ice,
            snippet: truncate_chars(source_text, SNIPPET_MAX_CHARS),
        }
    }
}

/// Running statistics for one drink within one aggregation run.
///
/// Vote maps are kept as insertion-ordered pairs so that ties resolve to the
/// level that was seen first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkStat {
    pub drink: String,
    pub mention_count: usize,
    pub sugar_votes: Vec<(String, usize)>,
    pub ice_votes: Vec<(String, usize)>,
}

impl DrinkStat {
    #[must_use]
    pub fn new(drink: impl Into<String>) -> Self {
        Self {
            drink: drink.into(),
            mention_count: 0,
            sugar_votes: Vec::new(),
            ice_votes: Vec::new(),
        }
    }

    pub fn vote_sugar(&mut self, level: &str) {
        add_vote(&mut self.sugar_votes, level);
    }

    pub fn vote_ice(&mut self, level: &str) {
        add_vote(&mut self.ice_votes, level);
    }

    /// Most voted sweetness level; the earliest seen wins a tie.
    #[must_use]
    pub fn modal_sugar(&self) -> Option<&str> {
        modal(&self.sugar_votes)
    }

    /// Most voted ice level; the earliest seen wins a tie.
    #[must_use]
    pub fn modal_ice(&self) -> Option<&str> {
        modal(&self.ice_votes)
    }
}

fn add_vote(votes: &mut Vec<(String, usize)>, level: &str) {
    if let Some((_, count)) = votes.iter_mut().find(|(l, _)| l == level) {
        *count += 1;
    } else {
        votes.push((level.to_string(), 1));
    }
}

fn modal(votes: &[(String, usize)]) -> Option<&str> {
    let mut best: Option<&(String, usize)> = None;
    for entry in votes {
        if best.is_none_or(|b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(level, _)| level.as_str())
}

/// Terminal output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub brand: String,
    /// Raw (non-deduplicated) mention count across all documents.
    pub total_mentions: usize,
    /// At most three entries, descending by `mention_count`.
    pub ranked_stats: Vec<DrinkStat>,
    pub primary_sentence: String,
    pub secondary_sentences: Vec<String>,
}

/// Truncate `text` to at most `max` characters (not bytes).
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_snippet_is_bounded_by_characters() {
        let long = "珍".repeat(200);
        let mention = Mention::new("珍珠奶茶", None, None, &long);
        assert_eq!(mention.snippet.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn modal_prefers_strictly_greater_count() {
        let mut stat = DrinkStat::new("紅茶");
        stat.vote_sugar("半糖");
        stat.vote_sugar("無糖");
        stat.vote_sugar("無糖");
        assert_eq!(stat.modal_sugar(), Some("無糖"));
    }

    #[test]
    fn modal_tie_keeps_first_seen() {
        let mut stat = DrinkStat::new("紅茶");
        stat.vote_ice("少冰");
        stat.vote_ice("去冰");
        assert_eq!(stat.modal_ice(), Some("少冰"));
    }

    #[test]
    fn modal_without_votes_is_none() {
        let stat = DrinkStat::new("紅茶");
        assert_eq!(stat.modal_sugar(), None);
        assert_eq!(stat.modal_ice(), None);
    }

    #[test]
    fn segment_unknown_uses_sentinel() {
        let segment = Segment::unknown("text");
        assert!(segment.is_unknown());
        assert_eq!(segment.brand, UNKNOWN_BRAND);
    }

    #[test]
    fn document_replies_default_to_empty() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"a","title":"t","body":"b"}"#).unwrap();
        assert!(doc.replies.is_empty());
    }
}
