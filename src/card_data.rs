/// Data structures for Anki Card Builder
use serde::{Deserialize, Serialize};

/// A flashcard accumulated in the export list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub deck: String,
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(deck: String, front: String, back: String) -> Card {
        Card { deck, front, back }
    }
}

/// The front/back text pair shown in the preview panes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardContent {
    pub front: String,
    pub back: String,
}

impl CardContent {
    pub fn new(front: String, back: String) -> CardContent {
        CardContent { front, back }
    }

    /// A card is addable when at least one side has text
    pub fn has_content(&self) -> bool {
        !self.front.is_empty() || !self.back.is_empty()
    }
}
