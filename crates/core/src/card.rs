//! Card and deck data shapes.
//!
//! These exist only as provider I/O: the agent never interprets game rules,
//! it hands decks to a [`crate::provider::DeckOptimizerProvider`] and relays
//! the result.

use serde::{Deserialize, Serialize};

/// A single card as seen by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub cost: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,

    /// Card type ("creature", "spell", ...); free-form, caller-defined.
    pub card_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<String>,
}

impl Card {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            attack: None,
            health: None,
            card_type: "creature".into(),
            element: None,
            abilities: Vec::new(),
        }
    }

    pub fn with_card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = card_type.into();
        self
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<String>) -> Self {
        self.abilities = abilities;
        self
    }
}

/// A named list of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cards,
        }
    }

    /// Mana-cost histogram, bucketed at 7+ like most curve displays.
    pub fn curve(&self) -> [usize; 8] {
        let mut buckets = [0usize; 8];
        for card in &self.cards {
            buckets[(card.cost as usize).min(7)] += 1;
        }
        buckets
    }
}
