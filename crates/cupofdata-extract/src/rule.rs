//! Dictionary-driven drink and modifier extraction.

use cupofdata_core::{KeywordDictionary, Mention};
use regex::Regex;

use crate::splitter::split_sentences;

/// One occurrence of a dictionary drink inside a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrinkHit<'a> {
    pub drink: &'a str,
    /// Byte offset of the occurrence.
    pub start: usize,
}

/// Rule-based extractor over a [`KeywordDictionary`].
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    dictionary: KeywordDictionary,
    /// Drinks ordered longest first, stable on declaration order.
    by_length: Vec<String>,
    /// Alternation of `by_length`; leftmost-first semantics make it leftmost-longest.
    scanner: Option<Regex>,
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new(KeywordDictionary::builtin())
    }
}

impl RuleExtractor {
    #[must_use]
    pub fn new(dictionary: KeywordDictionary) -> Self {
        let by_length: Vec<String> = dictionary
            .drinks_by_length()
            .into_iter()
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();

        let scanner = if by_length.is_empty() {
            None
        } else {
            let pattern = by_length
                .iter()
                .map(|d| regex::escape(d))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&pattern).expect("escaped literal alternation is a valid regex"))
        };

        Self {
            dictionary,
            by_length,
            scanner,
        }
    }

    #[must_use]
    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    /// Extract at most one mention from a single sentence.
    ///
    /// Picks the longest contained drink name; sweetness and ice are the first
    /// dictionary terms found anywhere in the same sentence.
    #[must_use]
    pub fn extract_sentence(&self, sentence: &str) -> Option<Mention> {
        let drink = self
            .by_length
            .iter()
            .find(|d| sentence.contains(d.as_str()))?;
        Some(self.mention_with_modifiers(drink, sentence, sentence))
    }

    /// Split `text` into sentences and extract from each, in order.
    #[must_use]
    pub fn extract_text(&self, text: &str) -> Vec<Mention> {
        split_sentences(text)
            .into_iter()
            .filter_map(|sentence| self.extract_sentence(sentence))
            .collect()
    }

    /// Every non-overlapping drink occurrence in `text`, leftmost-longest.
    ///
    /// "珍珠奶茶" consumes the "奶茶" inside it; a separate "奶茶" later in the
    /// text is still reported.
    #[must_use]
    pub fn scan_drinks<'a>(&self, text: &'a str) -> Vec<DrinkHit<'a>> {
        let Some(scanner) = &self.scanner else {
            return Vec::new();
        };
        scanner
            .find_iter(text)
            .map(|m| DrinkHit {
                drink: m.as_str(),
                start: m.start(),
            })
            .collect()
    }

    /// Build a mention for `drink`, reading modifiers from `modifier_text`.
    #[must_use]
    pub fn mention_with_modifiers(
        &self,
        drink: &str,
        modifier_text: &str,
        snippet_source: &str,
    ) -> Mention {
        Mention::new(
            drink,
            self.dictionary.find_sugar(modifier_text).map(str::to_string),
            self.dictionary.find_ice(modifier_text).map(str::to_string),
            snippet_source,
        )
    }
}
