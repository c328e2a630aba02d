//! Rule-based extraction merged with classifier entity suggestions.

use cupofdata_core::Mention;

use crate::capability::{Capabilities, Capability};
use crate::rule::RuleExtractor;
use crate::splitter::sentence_at;

/// Combines dictionary hits with the optional entity extractor.
///
/// The classifier only ever adds mentions; when it is missing or fails the
/// dictionary hits are returned on their own.
#[derive(Debug, Clone)]
pub struct HybridExtractor {
    rule: RuleExtractor,
}

impl HybridExtractor {
    #[must_use]
    pub fn new(rule: RuleExtractor) -> Self {
        Self { rule }
    }

    #[must_use]
    pub fn rule(&self) -> &RuleExtractor {
        &self.rule
    }

    /// Dictionary hits over the whole text, one mention per distinct drink.
    ///
    /// Modifiers and snippet come from the sentence holding the first occurrence.
    #[must_use]
    pub fn rule_mentions(&self, text: &str) -> Vec<Mention> {
        let mut mentions: Vec<Mention> = Vec::new();
        for hit in self.rule.scan_drinks(text) {
            if mentions.iter().any(|m| m.drink == hit.drink) {
                continue;
            }
            let sentence = sentence_at(text, hit.start);
            mentions.push(self.rule.mention_with_modifiers(hit.drink, sentence, sentence));
        }
        mentions
    }

    /// Extract the deduplicated mention list for one document's text.
    pub async fn extract(&self, text: &str, caps: &Capabilities) -> Vec<Mention> {
        let mut mentions = self.rule_mentions(text);

        let suggested = match &caps.entity_extractor {
            Some(extractor) if !text.trim().is_empty() => {
                match caps
                    .call(Capability::EntityExtraction, extractor.extract_drinks(text))
                    .await
                {
                    Ok(drinks) => drinks,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "entity extraction failed; using dictionary hits only"
                        );
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        for drink in suggested {
            let drink = drink.trim();
            if drink.is_empty() || mentions.iter().any(|m| m.drink == drink) {
                continue;
            }
            tracing::debug!(drink, "classifier suggested drink");
            mentions.push(self.rule.mention_with_modifiers(drink, text, text));
        }

        mentions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::capability::EntityExtractor;
    use crate::error::ClassifierError;

    struct FixedExtractor(Vec<&'static str>);

    #[async_trait]
    impl EntityExtractor for FixedExtractor {
        async fn extract_drinks(&self, _text: &str) -> Result<Vec<String>, ClassifierError> {
            Ok(self.0.iter().map(|s| (*s).to_string()).collect())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl EntityExtractor for FailingExtractor {
        async fn extract_drinks(&self, _text: &str) -> Result<Vec<String>, ClassifierError> {
            Err(ClassifierError::MalformedResponse {
                capability: Capability::EntityExtraction,
                reason: "not json".to_string(),
            })
        }
    }

    fn caps_with(extractor: Arc<dyn EntityExtractor>) -> Capabilities {
        Capabilities {
            entity_extractor: Some(extractor),
            ..Capabilities::none()
        }
    }

    #[tokio::test]
    async fn rule_only_without_classifier() {
        let hybrid = HybridExtractor::new(RuleExtractor::default());
        let mentions = hybrid
            .extract("珍珠奶茶半糖少冰。綠茶無糖去冰！", &Capabilities::none())
            .await;
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].drink, "珍珠奶茶");
        assert_eq!(mentions[0].sugar.as_deref(), Some("半糖"));
        assert_eq!(mentions[0].ice.as_deref(), Some("少冰"));
        assert_eq!(mentions[1].drink, "綠茶");
        assert_eq!(mentions[1].sugar.as_deref(), Some("無糖"));
        assert_eq!(mentions[1].ice.as_deref(), Some("去冰"));
    }

    #[tokio::test]
    async fn classifier_drinks_are_appended_without_duplicates() {
        let hybrid = HybridExtractor::new(RuleExtractor::default());
        let caps = caps_with(Arc::new(FixedExtractor(vec![
            "紅茶",
            "抹茶奶霜",
            "  ",
            "抹茶奶霜",
        ])));
        let mentions = hybrid.extract("紅茶微糖。抹茶奶霜也很推", &caps).await;
        let drinks: Vec<&str> = mentions.iter().map(|m| m.drink.as_str()).collect();
        assert_eq!(drinks, vec!["紅茶", "抹茶奶霜"]);
        // Classifier mentions take modifiers from the whole text.
        assert_eq!(mentions[1].sugar.as_deref(), Some("微糖"));
    }

    #[tokio::test]
    async fn classifier_failure_keeps_rule_hits() {
        let hybrid = HybridExtractor::new(RuleExtractor::default());
        let caps = caps_with(Arc::new(FailingExtractor));
        let mentions = hybrid.extract("冬瓜茶好喝", &caps).await;
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].drink, "冬瓜茶");
    }

    #[tokio::test]
    async fn repeated_drink_is_reported_once() {
        let hybrid = HybridExtractor::new(RuleExtractor::default());
        let mentions = hybrid
            .extract("紅茶半糖。紅茶無糖。紅茶正常糖", &Capabilities::none())
            .await;
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].sugar.as_deref(), Some("半糖"));
    }

    #[tokio::test]
    async fn mentions_never_share_a_drink_name() {
        let hybrid = HybridExtractor::new(RuleExtractor::default());
        let caps = caps_with(Arc::new(FixedExtractor(vec!["奶茶", "珍珠奶茶", "奶茶"])));
        let mentions = hybrid
            .extract("珍珠奶茶和奶茶，還有珍珠奶茶", &caps)
            .await;
        let mut drinks: Vec<&str> = mentions.iter().map(|m| m.drink.as_str()).collect();
        let before = drinks.len();
        drinks.sort_unstable();
        drinks.dedup();
        assert_eq!(before, drinks.len());
        assert_eq!(before, 2);
    }
}
