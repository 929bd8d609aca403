/// CSV serialization for the accumulated card list
use crate::card_data::Card;

/// Fixed download filename for exported cards
pub const EXPORT_FILENAME: &str = "anki_cards.csv";

/// Serialize cards as `"deck","front","back"` rows, newline-joined, no header.
///
/// Fields are not escaped: embedded quotes, commas, or newlines in card text
/// corrupt the row.
pub fn to_csv(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| format!("\"{}\",\"{}\",\"{}\"", card.deck, card.front, card.back))
        .collect::<Vec<String>>()
        .join("\n")
}
