use serde::{Deserialize, Serialize};
use std::fmt;

/// Action cards resolved when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Forces three additional draws on the drawer
    FlipThree,
    /// Locks the drawer's round score immediately
    Freeze,
    /// Absorbs the next duplicate number instead of busting
    SecondChance,
}

/// Modifier cards adjusting the running round total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// Adds the amount to the round total
    Plus(u32),
    /// Multiplies the round total by the amount
    Times(u32),
}

/// Unified card enum. Number values range 0-12 in the standard set.
/// Cards are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    Number(u8),
    Action(ActionKind),
    Modifier(ModifierKind),
}

impl Card {
    /// Face value contributed to the round total (0 for non-number cards)
    pub fn points(&self) -> u32 {
        match self {
            Card::Number(value) => u32::from(*value),
            _ => 0,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Card::Number(_))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number(value) => write!(f, "{}", value),
            Card::Action(ActionKind::FlipThree) => write!(f, "Flip Three"),
            Card::Action(ActionKind::Freeze) => write!(f, "Freeze"),
            Card::Action(ActionKind::SecondChance) => write!(f, "Second Chance"),
            Card::Modifier(ModifierKind::Plus(amount)) => write!(f, "+{}", amount),
            Card::Modifier(ModifierKind::Times(amount)) => write!(f, "x{}", amount),
        }
    }
}
