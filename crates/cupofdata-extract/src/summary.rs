//! Deterministic text rendering of ranked drink statistics.

use cupofdata_core::DrinkStat;

use crate::capability::{Capabilities, Capability};

pub const NO_DATA_SENTENCE: &str = "目前還沒有相關飲料被提到～";

/// Returned when the prose summarizer is missing or fails.
pub const SUMMARY_UNAVAILABLE: &str = "（AI 摘要暫不可用）";

/// Headline naming the top drink and, when present, the runner-up.
#[must_use]
pub fn primary_sentence(brand: &str, ranked: &[DrinkStat]) -> String {
    match ranked {
        [] => NO_DATA_SENTENCE.to_string(),
        [first] => format!("最多人推薦 {brand} 的「{}」！", first.drink),
        [first, second, ..] => format!(
            "最多人推薦 {brand} 的「{}」！另外「{}」也很常被提到～",
            first.drink, second.drink
        ),
    }
}

/// One line per drink after the first, citing its modal sweetness and ice.
#[must_use]
pub fn secondary_sentences(ranked: &[DrinkStat]) -> Vec<String> {
    ranked
        .iter()
        .skip(1)
        .map(|stat| {
            let extras: Vec<&str> = [stat.modal_sugar(), stat.modal_ice()]
                .into_iter()
                .flatten()
                .collect();
            if extras.is_empty() {
                format!("「{}」也不錯喔！", stat.drink)
            } else {
                format!("「{}」（建議：{}）也不錯喔！", stat.drink, extras.join(" · "))
            }
        })
        .collect()
}

/// `drink（sugar·ice）`, omitting the parenthetical when neither is known.
#[must_use]
pub fn format_drink_label(stat: &DrinkStat) -> String {
    match (stat.modal_sugar(), stat.modal_ice()) {
        (Some(sugar), Some(ice)) => format!("{}（{sugar}·{ice}）", stat.drink),
        (Some(level), None) | (None, Some(level)) => format!("{}（{level}）", stat.drink),
        (None, None) => stat.drink.clone(),
    }
}

/// One line per ranked drink with its document count.
#[must_use]
pub fn compose_lines(ranked: &[DrinkStat]) -> Vec<String> {
    ranked
        .iter()
        .map(|stat| format!("{} — {} 篇提到", format_drink_label(stat), stat.mention_count))
        .collect()
}

/// Prose summary from the injected summarizer, or a placeholder.
pub async fn summarize_with(brand: &str, ranked: &[DrinkStat], caps: &Capabilities) -> String {
    let Some(summarizer) = &caps.summarizer else {
        return SUMMARY_UNAVAILABLE.to_string();
    };
    if ranked.is_empty() {
        return SUMMARY_UNAVAILABLE.to_string();
    }

    match caps
        .call(Capability::Summary, summarizer.summarize(brand, ranked))
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(brand, "prose summarizer returned empty text");
            SUMMARY_UNAVAILABLE.to_string()
        }
        Err(e) => {
            tracing::warn!(brand, error = %e, "prose summary failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}
