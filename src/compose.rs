/// Card composition logic: turning selected text into front/back content
use crate::card_data::CardContent;

/// How the selected text is distributed over the two card sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenerateMode {
    /// Full text on the front, empty back
    Front,
    /// Empty front, full text on the back
    Back,
    /// Split at the first period: prefix on the front, remainder on the back
    Both,
}

/// Generate card content from the current text and a mode
///
/// For `Both` the split offset is the length of the text's prefix up to
/// (not including) the first '.', applied as an offset into the original
/// text. The back therefore starts with the period itself. With no period
/// the offset equals the full length (front = everything, back = empty).
///
/// Examples:
/// - "Hello world. Goodbye." → front "Hello world", back ". Goodbye."
/// - "No period here" → front "No period here", back ""
pub fn generate_card(text: &str, mode: GenerateMode) -> CardContent {
    match mode {
        GenerateMode::Front => CardContent::new(text.to_string(), String::new()),
        GenerateMode::Back => CardContent::new(String::new(), text.to_string()),
        GenerateMode::Both => {
            let split = text.find('.').unwrap_or(text.len());
            CardContent::new(text[..split].to_string(), text[split..].to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_front() {
        let content = generate_card("Some selected text", GenerateMode::Front);

        assert_eq!(content.front, "Some selected text");
        assert_eq!(content.back, "");
    }

    #[test]
    fn test_generate_back() {
        let content = generate_card("Some selected text", GenerateMode::Back);

        assert_eq!(content.front, "");
        assert_eq!(content.back, "Some selected text");
    }

    #[test]
    fn test_generate_both_splits_at_first_period() {
        let content = generate_card("Hello world. Goodbye.", GenerateMode::Both);

        assert_eq!(content.front, "Hello world");
        assert_eq!(content.back, ". Goodbye.");
    }

    #[test]
    fn test_generate_both_without_period() {
        let content = generate_card("No period here", GenerateMode::Both);

        assert_eq!(content.front, "No period here");
        assert_eq!(content.back, "");
    }

    #[test]
    fn test_generate_both_leading_period() {
        let content = generate_card(".starts with one", GenerateMode::Both);

        assert_eq!(content.front, "");
        assert_eq!(content.back, ".starts with one");
    }

    #[test]
    fn test_generate_both_empty_text() {
        let content = generate_card("", GenerateMode::Both);

        assert_eq!(content.front, "");
        assert_eq!(content.back, "");
    }

    #[test]
    fn test_generate_both_sentence_example() {
        let text = "Photosynthesis converts light. Plants use it to grow.";
        let content = generate_card(text, GenerateMode::Both);

        assert_eq!(content.front, "Photosynthesis converts light");
        assert_eq!(content.back, ". Plants use it to grow.");
    }
}
