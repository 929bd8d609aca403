/// Store serialization and bootstrap logic for chrome.storage.local
///
/// The persistent store holds two top-level keys, `decks` and `cards`, and is
/// always written whole (both keys in a single set call). Last writer wins;
/// there is no locking or version check across contexts.

use crate::card_data::Card;
use serde::{Deserialize, Serialize};

/// Top-level keys read from and written to the platform store
pub const STORE_KEYS: [&str; 2] = ["decks", "cards"];

/// In-memory copy of the persistent store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreData {
    pub decks: Vec<String>,
    pub cards: Vec<Card>,
}

impl StoreData {
    pub fn new() -> Self {
        StoreData {
            decks: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Build store state from a raw read, defaulting missing keys to empty
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        StoreData {
            decks: snapshot.decks.unwrap_or_default(),
            cards: snapshot.cards.unwrap_or_default(),
        }
    }

    /// Append a deck name; rejects empty names and duplicates
    pub fn add_deck(&mut self, name: &str) -> bool {
        if name.is_empty() || self.decks.iter().any(|deck| deck == name) {
            return false;
        }
        self.decks.push(name.to_string());
        true
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the card at `index`. An out-of-range index is a caller error.
    pub fn remove_card(&mut self, index: usize) -> Card {
        self.cards.remove(index)
    }
}

impl Default for StoreData {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw view of a store read: a key absent from the platform store (as opposed
/// to present-but-empty) deserializes to `None`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub decks: Option<Vec<String>>,
    #[serde(default)]
    pub cards: Option<Vec<Card>>,
}

/// Decide whether first-run initialization must write the store.
///
/// Returns the empty store to write when EITHER key is absent, `None` when
/// both are present. Empty-but-present sequences are left alone, which makes
/// the bootstrap idempotent and safe on every install or update.
pub fn bootstrap_plan(snapshot: &StoreSnapshot) -> Option<StoreData> {
    if snapshot.decks.is_none() || snapshot.cards.is_none() {
        Some(StoreData::new())
    } else {
        None
    }
}

/// Bounded-retry policy for a flaky platform call: `attempts` retries spaced
/// `delay_ms` apart, after which the caller degrades to a default value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay_ms: u32) -> Self {
        RetryPolicy { attempts, delay_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(decks: Option<Vec<&str>>, cards: Option<Vec<Card>>) -> StoreSnapshot {
        StoreSnapshot {
            decks: decks.map(|names| names.into_iter().map(String::from).collect()),
            cards,
        }
    }

    fn sample_card() -> Card {
        Card::new("Biology".to_string(), "front".to_string(), "back".to_string())
    }

    #[test]
    fn test_store_data_new() {
        let store = StoreData::new();
        assert_eq!(store.decks.len(), 0);
        assert_eq!(store.cards.len(), 0);
    }

    #[test]
    fn test_from_snapshot_defaults_missing_keys() {
        let store = StoreData::from_snapshot(snapshot(None, Some(vec![sample_card()])));

        assert_eq!(store.decks.len(), 0);
        assert_eq!(store.cards.len(), 1);
    }

    #[test]
    fn test_add_deck() {
        let mut store = StoreData::new();

        assert!(store.add_deck("Biology"));

        assert_eq!(store.decks, vec!["Biology".to_string()]);
    }

    #[test]
    fn test_add_deck_rejects_duplicate() {
        let mut store = StoreData::new();
        store.add_deck("Biology");

        assert!(!store.add_deck("Biology"));

        assert_eq!(store.decks.len(), 1);
    }

    #[test]
    fn test_add_deck_rejects_empty_name() {
        let mut store = StoreData::new();

        assert!(!store.add_deck(""));

        assert_eq!(store.decks.len(), 0);
    }

    #[test]
    fn test_remove_card_removes_exactly_one() {
        let mut store = StoreData::new();
        store.add_card(Card::new("A".to_string(), "f1".to_string(), "b1".to_string()));
        store.add_card(Card::new("A".to_string(), "f2".to_string(), "b2".to_string()));
        store.add_card(Card::new("A".to_string(), "f3".to_string(), "b3".to_string()));

        let removed = store.remove_card(1);

        assert_eq!(removed.front, "f2");
        assert_eq!(store.cards.len(), 2);
        assert_eq!(store.cards[0].front, "f1");
        assert_eq!(store.cards[1].front, "f3");
    }

    #[test]
    fn test_duplicate_cards_permitted() {
        let mut store = StoreData::new();
        store.add_card(sample_card());
        store.add_card(sample_card());

        assert_eq!(store.cards.len(), 2);
    }

    #[test]
    fn test_bootstrap_plan_initializes_when_either_key_absent() {
        let missing_both = snapshot(None, None);
        let missing_cards = snapshot(Some(vec!["Biology"]), None);
        let missing_decks = snapshot(None, Some(vec![sample_card()]));

        assert_eq!(bootstrap_plan(&missing_both), Some(StoreData::new()));
        assert_eq!(bootstrap_plan(&missing_cards), Some(StoreData::new()));
        assert_eq!(bootstrap_plan(&missing_decks), Some(StoreData::new()));
    }

    #[test]
    fn test_bootstrap_plan_is_idempotent() {
        let populated = snapshot(Some(vec!["Biology"]), Some(vec![sample_card()]));
        let empty_but_present = snapshot(Some(vec![]), Some(vec![]));

        // Present keys, even empty ones, are never clobbered
        assert_eq!(bootstrap_plan(&populated), None);
        assert_eq!(bootstrap_plan(&empty_but_present), None);
    }

    #[test]
    fn test_snapshot_distinguishes_absent_from_empty() {
        let raw = serde_json::json!({"decks": []});
        let parsed: StoreSnapshot = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed.decks, Some(vec![]));
        assert!(parsed.cards.is_none());
    }

    #[test]
    fn test_store_wire_shape() {
        let mut store = StoreData::new();
        store.add_deck("Biology");
        store.add_card(sample_card());

        let value = serde_json::to_value(&store).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "decks": ["Biology"],
                "cards": [{"deck": "Biology", "front": "front", "back": "back"}],
            })
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut store = StoreData::new();
        store.add_deck("Biology");
        store.add_card(sample_card());

        let json = serde_json::to_string(&store).unwrap();
        let deserialized: StoreData = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, store);
    }
}
