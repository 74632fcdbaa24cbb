use crate::card::{Card, CardSetConfig};
use crate::rng::GameRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("draw and discard piles are both empty")]
    Exhausted,
}

/// Draw and discard piles for one game. The deck owns the game's PRNG; the
/// reshuffle is observable only through draw order.
///
/// Conservation invariant: draw pile + discard pile + cards in play always
/// equals the fixed card set (`full_count`). Cards leave through `draw` and
/// return through `discard`.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    full_count: usize,
    rng: GameRng,
}

impl Deck {
    /// Build a shuffled deck from a card-set composition
    pub fn new(set: &CardSetConfig, mut rng: GameRng) -> Self {
        let mut draw_pile = set.build();
        rng.shuffle(&mut draw_pile);
        let full_count = draw_pile.len();
        Deck {
            draw_pile,
            discard_pile: Vec::new(),
            full_count,
            rng,
        }
    }

    /// Build a deck that draws `cards` in exactly the given order, for
    /// deterministic tests and replays. Reshuffles still use `rng`.
    pub fn stacked(mut cards: Vec<Card>, rng: GameRng) -> Self {
        // top of the draw pile is the last element
        cards.reverse();
        let full_count = cards.len();
        Deck {
            draw_pile: cards,
            discard_pile: Vec::new(),
            full_count,
            rng,
        }
    }

    /// Remove and return the top card of the draw pile, reshuffling the
    /// discard pile into a new draw pile first if the draw pile is empty.
    /// Fails only when both piles are empty.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            std::mem::swap(&mut self.draw_pile, &mut self.discard_pile);
            self.rng.shuffle(&mut self.draw_pile);
        }
        self.draw_pile.pop().ok_or(DeckError::Exhausted)
    }

    /// Append a card to the discard pile. No validation of card origin.
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn draw_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Size of the fixed card set this deck was built from
    pub fn full_count(&self) -> usize {
        self.full_count
    }

    /// Cards currently out of both piles (held by players)
    pub fn in_play(&self) -> usize {
        self.full_count - self.draw_pile.len() - self.discard_pile.len()
    }
}
