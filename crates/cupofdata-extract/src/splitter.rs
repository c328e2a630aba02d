//! Sentence splitting on terminal punctuation and line breaks.

/// Characters that end a sentence-like unit.
const DELIMITERS: &[char] = &['。', '！', '？', '．', '!', '?', '.', '\n', '\r'];

/// Split `text` into trimmed, non-empty sentences in source order.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The trimmed sentence that contains the byte at `offset`.
///
/// `offset` must lie on a character boundary; offsets past the end clamp to
/// the last sentence.
#[must_use]
pub fn sentence_at(text: &str, offset: usize) -> &str {
    let offset = offset.min(text.len());
    let start = text[..offset]
        .rfind(DELIMITERS)
        .map_or(0, |i| i + next_char_len(text, i));
    let end = text[offset..]
        .find(DELIMITERS)
        .map_or(text.len(), |i| offset + i);
    text[start..end].trim()
}

fn next_char_len(text: &str, index: usize) -> usize {
    text[index..].chars().next().map_or(0, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n\r  ").is_empty());
    }

    #[test]
    fn splits_on_full_width_and_ascii_punctuation() {
        let sentences = split_sentences("紅茶很好喝。綠茶普通！奶茶呢？ok!yes?fine.");
        assert_eq!(
            sentences,
            vec!["紅茶很好喝", "綠茶普通", "奶茶呢", "ok", "yes", "fine"]
        );
    }

    #[test]
    fn splits_on_line_breaks_and_trims() {
        let sentences = split_sentences("  第一行 \r\n\n 第二行  ");
        assert_eq!(sentences, vec!["第一行", "第二行"]);
    }

    #[test]
    fn sentence_at_finds_enclosing_sentence() {
        let text = "今天喝紅茶。珍珠奶茶半糖少冰，很順口！";
        let offset = text.find("珍珠").unwrap();
        assert_eq!(sentence_at(text, offset), "珍珠奶茶半糖少冰，很順口");
        assert_eq!(sentence_at(text, 0), "今天喝紅茶");
    }

    #[test]
    fn sentence_at_without_delimiters_is_whole_text() {
        assert_eq!(sentence_at(" 紅茶無糖 ", 1), "紅茶無糖");
    }

    #[test]
    fn comma_does_not_split() {
        let sentences = split_sentences("珍珠奶茶半糖少冰，喝起來很順口");
        assert_eq!(sentences, vec!["珍珠奶茶半糖少冰，喝起來很順口"]);
    }
}
