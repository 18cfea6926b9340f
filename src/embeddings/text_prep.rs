// text_prep.rs — Text preparation for embedding generation.
//
// Item descriptions and queries are short free text ("USB-C charger, blue, kitchen drawer").
// We normalise whitespace and truncate to fit the model's context window
// (256 word-piece tokens for all-MiniLM-L6-v2). The stored description is never altered.

use crate::config;

/// Prepare embedding text for an item description or a search query.
pub fn prepare_item_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_words(&collapsed, config::embedding::MAX_INPUT_WORDS)
}

/// Truncate text to at most `max_words` words, preserving word boundaries.
fn truncate_words(text: &str, max_words: usize) -> String {
    let mut words = 0;
    let mut end = 0;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            words += 1;
            if words >= max_words {
                end = i;
                break;
            }
        }
        end = i + c.len_utf8();
    }

    text[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_item_text_collapses_whitespace() {
        let text = prepare_item_text("  electric toothbrush heads,\n 6-pack,\tthird shelf  ");
        assert_eq!(text, "electric toothbrush heads, 6-pack, third shelf");
    }

    #[test]
    fn test_prepare_item_text_empty() {
        assert_eq!(prepare_item_text(""), "");
        assert_eq!(prepare_item_text("   \n\t"), "");
    }

    #[test]
    fn test_prepare_item_text_keeps_unicode() {
        assert_eq!(prepare_item_text("蓝色 充电线 厨房抽屉"), "蓝色 充电线 厨房抽屉");
    }

    #[test]
    fn test_prepare_item_text_caps_word_count() {
        let long = vec!["word"; config::embedding::MAX_INPUT_WORDS + 50].join(" ");
        let prepared = prepare_item_text(&long);
        assert_eq!(prepared.split_whitespace().count(), config::embedding::MAX_INPUT_WORDS);
    }

    #[test]
    fn test_truncate_words() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(truncate_words(text, 5), "one two three four five");
        assert_eq!(truncate_words(text, 100), text);
        assert_eq!(truncate_words("", 5), "");
    }
}
