use crate::card::types::{ActionKind, Card, ModifierKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardSetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Card-set composition: how many copies of each card go into the deck.
///
/// The default follows the standard Flip7 set: one 0, then v copies of each
/// value v from 1 to 12, four of each action card, one each of +2 through
/// +10, and two x2 cards - 98 cards total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSetConfig {
    /// Copies per number value
    pub number_counts: BTreeMap<u8, u32>,
    pub flip_three: u32,
    pub freeze: u32,
    pub second_chance: u32,
    /// One additive card per entry
    pub additive: Vec<u32>,
    /// One multiplier card per entry
    pub multiplier: Vec<u32>,
}

impl Default for CardSetConfig {
    fn default() -> Self {
        let number_counts = (0u8..=12)
            .map(|value| (value, u32::from(value).max(1)))
            .collect();
        CardSetConfig {
            number_counts,
            flip_three: 4,
            freeze: 4,
            second_chance: 4,
            additive: vec![2, 4, 6, 8, 10],
            multiplier: vec![2, 2],
        }
    }
}

impl CardSetConfig {
    /// Load a card-set composition from a JSON file
    pub fn from_file(path: &str) -> Result<Self, CardSetError> {
        let content = std::fs::read_to_string(path)?;
        let set = serde_json::from_str(&content)?;
        Ok(set)
    }

    /// Expand the composition into the full card list, unshuffled
    pub fn build(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.card_count());
        for (&value, &copies) in &self.number_counts {
            for _ in 0..copies {
                cards.push(Card::Number(value));
            }
        }
        for _ in 0..self.flip_three {
            cards.push(Card::Action(ActionKind::FlipThree));
        }
        for _ in 0..self.freeze {
            cards.push(Card::Action(ActionKind::Freeze));
        }
        for _ in 0..self.second_chance {
            cards.push(Card::Action(ActionKind::SecondChance));
        }
        for &amount in &self.additive {
            cards.push(Card::Modifier(ModifierKind::Plus(amount)));
        }
        for &amount in &self.multiplier {
            cards.push(Card::Modifier(ModifierKind::Times(amount)));
        }
        cards
    }

    /// Total number of cards in the set
    pub fn card_count(&self) -> usize {
        let numbers: u32 = self.number_counts.values().sum();
        let actions = self.flip_three + self.freeze + self.second_chance;
        numbers as usize + actions as usize + self.additive.len() + self.multiplier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_count() == 0
    }
}
