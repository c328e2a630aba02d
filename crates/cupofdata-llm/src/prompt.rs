//! Prompt text for each classifier call.

use cupofdata_core::DrinkStat;
use cupofdata_extract::format_drink_label;

/// Longest input forwarded to the model, in characters.
const MAX_INPUT_CHARS: usize = 6_000;

fn clip(text: &str) -> String {
    text.chars().take(MAX_INPUT_CHARS).collect()
}

pub(crate) fn extract_drinks(text: &str) -> String {
    format!(
        "你是飲品名稱抽取器。找出下列文字中提到的飲品名稱，不要包含店名。\n\
         只回傳 JSON 物件，格式為 {{\"drinks\": [\"珍珠奶茶\", \"四季春青茶\"]}}；\
         沒有飲品時回傳 {{\"drinks\": []}}。\n\n文字：\n{}",
        clip(text)
    )
}

pub(crate) fn relevance(brand: &str, text: &str) -> String {
    format!(
        "你是文字分類器。判斷以下內容是否在討論「{brand}」這家飲料店的產品。\n\
         若內容在講其他品牌，或只提到飲料而沒有明確的品牌關聯，請回答 NO。\n\
         只回答 YES 或 NO。\n---\n{}\n---",
        clip(text)
    )
}

pub(crate) fn opinion(text: &str) -> String {
    format!(
        "你是分類器，判斷一句話是否在描述飲品的味道、比較、推薦或心得。\n\
         純粹的品牌介紹、品項列表、價格地址排隊等事實敘述都不算。\n\
         只回答 true 或 false。\n\n句子：\n{}",
        clip(text)
    )
}

pub(crate) fn segment(text: &str) -> String {
    format!(
        "你是品牌段落分割器。閱讀以下文章，找出提到的各個飲料品牌，\
         把與該品牌相關的原文內容歸到同一段。\n\
         只列出確實有內容的品牌，brand 使用原文中的名稱；無法歸屬的內容用 brand \"unknown\"。\n\
         只回傳 JSON 物件，格式為 {{\"segments\": [{{\"brand\": \"品牌\", \"content\": \"內容\"}}]}}。\n---\n{}",
        clip(text)
    )
}

pub(crate) fn summarize(brand: &str, stats: &[DrinkStat]) -> String {
    let ranked = stats
        .iter()
        .map(format_drink_label)
        .collect::<Vec<_>>()
        .join("、");
    format!(
        "你是飲料推薦文案助手。根據以下熱門飲品，用自然的口吻總結大家對「{brand}」的推薦，\
         控制在兩到三句，不要列點。\n---\n熱門飲品：{ranked}\n---"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_input_is_clipped() {
        let text = "茶".repeat(MAX_INPUT_CHARS + 50);
        let prompt = opinion(&text);
        assert_eq!(prompt.matches('茶').count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn summary_prompt_lists_labels() {
        let mut stat = DrinkStat::new("珍珠奶茶");
        stat.vote_sugar("半糖");
        let prompt = summarize("五十嵐", &[stat, DrinkStat::new("紅茶")]);
        assert!(prompt.contains("珍珠奶茶（半糖）、紅茶"));
        assert!(prompt.contains("「五十嵐」"));
    }
}
