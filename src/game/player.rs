use crate::card::{ActionKind, Card, ModifierKind};

/// Per-round player status. Frozen and Busted players take no further turns
/// until the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Active,
    Frozen,
    Busted,
}

/// Effect of applying one drawn card. Variants carry the cards that leave
/// play immediately so the caller can return them to the deck's discard
/// pile; everything else stays in the player's tableau until round end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// New number value kept, round total updated
    Scored,
    /// Duplicate number with no second chance held
    Busted(Card),
    /// Duplicate absorbed by the held second chance; both cards leave play
    SecondChanceUsed { duplicate: Card, spent: Card },
    /// Freeze resolved, round score locked
    Frozen(Card),
    /// Second chance kept for later
    SecondChanceHeld,
    /// The caller owes three forced draws
    FlipThree(Card),
    /// Modifier applied to the round total immediately
    Modified,
}

/// One player's in-round and cumulative progress.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub status: PlayerStatus,
    /// True while a Second Chance card sits unspent in the tableau
    pub has_second_chance: bool,
    /// Distinct number values drawn this round
    pub round_values: Vec<u8>,
    /// Running round point total, modifiers applied in draw order
    pub round_total: u32,
    /// Cumulative game score, persists across rounds
    pub total_score: u32,
    tableau: Vec<Card>,
    finalized: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        PlayerState {
            status: PlayerStatus::Active,
            has_second_chance: false,
            round_values: Vec::new(),
            round_total: 0,
            total_score: 0,
            tableau: Vec::new(),
            finalized: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Distinct number values drawn this round
    pub fn distinct_count(&self) -> usize {
        self.round_values.len()
    }

    /// Cards currently held in play this round
    pub fn tableau(&self) -> &[Card] {
        &self.tableau
    }

    /// Apply a drawn card's effect.
    ///
    /// Modifiers are applied immediately in draw order: +n adds to the
    /// running round total, xn multiplies it. A duplicate number busts
    /// unless a second chance is held, in which case the second chance is
    /// consumed instead and neither card stays in play.
    pub fn record_draw(&mut self, card: Card) -> DrawOutcome {
        match card {
            Card::Number(value) => {
                if self.round_values.contains(&value) {
                    if let Some(spent) = self.take_second_chance() {
                        return DrawOutcome::SecondChanceUsed {
                            duplicate: card,
                            spent,
                        };
                    }
                    self.status = PlayerStatus::Busted;
                    return DrawOutcome::Busted(card);
                }
                self.round_values.push(value);
                self.round_total += card.points();
                self.tableau.push(card);
                DrawOutcome::Scored
            }
            Card::Action(ActionKind::Freeze) => {
                self.status = PlayerStatus::Frozen;
                DrawOutcome::Frozen(card)
            }
            Card::Action(ActionKind::SecondChance) => {
                self.has_second_chance = true;
                self.tableau.push(card);
                DrawOutcome::SecondChanceHeld
            }
            Card::Action(ActionKind::FlipThree) => DrawOutcome::FlipThree(card),
            Card::Modifier(ModifierKind::Plus(amount)) => {
                self.round_total += amount;
                self.tableau.push(card);
                DrawOutcome::Modified
            }
            Card::Modifier(ModifierKind::Times(amount)) => {
                self.round_total *= amount;
                self.tableau.push(card);
                DrawOutcome::Modified
            }
        }
    }

    /// Remove one held Second Chance card from the tableau, if any, and
    /// refresh the flag (a player can be holding more than one).
    fn take_second_chance(&mut self) -> Option<Card> {
        if !self.has_second_chance {
            return None;
        }
        let idx = self
            .tableau
            .iter()
            .position(|c| *c == Card::Action(ActionKind::SecondChance))?;
        let spent = self.tableau.remove(idx);
        self.has_second_chance = self
            .tableau
            .contains(&Card::Action(ActionKind::SecondChance));
        Some(spent)
    }

    /// Bank the round total into the cumulative score. Busted rounds bank
    /// zero. A full distinct set of `flip7_size` number values earns
    /// `flip7_bonus` on top of the round total first.
    ///
    /// Idempotent: a second call without an intervening `reset_round` is a
    /// no-op returning 0.
    pub fn finalize_round(&mut self, flip7_size: usize, flip7_bonus: u32) -> u32 {
        if self.finalized {
            return 0;
        }
        self.finalized = true;
        if self.status == PlayerStatus::Busted {
            return 0;
        }
        if self.round_values.len() >= flip7_size {
            self.round_total += flip7_bonus;
        }
        self.total_score += self.round_total;
        self.round_total
    }

    /// Clear all round state and return the tableau cards for the deck's
    /// discard pile. Cumulative score is unaffected.
    pub fn reset_round(&mut self) -> Vec<Card> {
        self.status = PlayerStatus::Active;
        self.has_second_chance = false;
        self.round_values.clear();
        self.round_total = 0;
        self.finalized = false;
        std::mem::take(&mut self.tableau)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_number_scores() {
        let mut player = PlayerState::new();
        assert_eq!(player.record_draw(Card::Number(5)), DrawOutcome::Scored);
        assert_eq!(player.record_draw(Card::Number(7)), DrawOutcome::Scored);
        assert_eq!(player.round_total, 12);
        assert_eq!(player.distinct_count(), 2);
        assert!(player.is_active());
    }

    #[test]
    fn test_duplicate_number_busts() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(5));
        let outcome = player.record_draw(Card::Number(5));
        assert_eq!(outcome, DrawOutcome::Busted(Card::Number(5)));
        assert_eq!(player.status, PlayerStatus::Busted);
    }

    #[test]
    fn test_second_chance_absorbs_duplicate() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(5));
        player.record_draw(Card::Action(ActionKind::SecondChance));
        assert!(player.has_second_chance);

        let outcome = player.record_draw(Card::Number(5));
        assert_eq!(
            outcome,
            DrawOutcome::SecondChanceUsed {
                duplicate: Card::Number(5),
                spent: Card::Action(ActionKind::SecondChance),
            }
        );
        assert!(player.is_active(), "Absorbed duplicate should not bust");
        assert!(!player.has_second_chance, "Second chance should be consumed");
        assert_eq!(player.round_total, 5, "Duplicate should not score");
    }

    #[test]
    fn test_freeze_locks_immediately() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(8));
        let outcome = player.record_draw(Card::Action(ActionKind::Freeze));
        assert_eq!(outcome, DrawOutcome::Frozen(Card::Action(ActionKind::Freeze)));
        assert_eq!(player.status, PlayerStatus::Frozen);
        assert_eq!(player.round_total, 8);
    }

    #[test]
    fn test_flip_three_reported_to_caller() {
        let mut player = PlayerState::new();
        let card = Card::Action(ActionKind::FlipThree);
        assert_eq!(player.record_draw(card), DrawOutcome::FlipThree(card));
        assert!(player.is_active());
        assert!(player.tableau().is_empty(), "Flip Three should not stay in play");
    }

    #[test]
    fn test_modifiers_apply_immediately_in_draw_order() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(5));
        player.record_draw(Card::Modifier(ModifierKind::Plus(4)));
        assert_eq!(player.round_total, 9);
        player.record_draw(Card::Modifier(ModifierKind::Times(2)));
        assert_eq!(player.round_total, 18);
        player.record_draw(Card::Number(1));
        assert_eq!(player.round_total, 19, "Later numbers are not multiplied");
    }

    #[test]
    fn test_finalize_banks_round_total() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(10));
        player.record_draw(Card::Number(2));
        let banked = player.finalize_round(7, 15);
        assert_eq!(banked, 12);
        assert_eq!(player.total_score, 12);
    }

    #[test]
    fn test_finalize_busted_banks_zero() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(5));
        player.record_draw(Card::Number(5));
        assert_eq!(player.finalize_round(7, 15), 0);
        assert_eq!(player.total_score, 0);
    }

    #[test]
    fn test_flip7_bonus_on_full_distinct_set() {
        let mut player = PlayerState::new();
        for v in 0..7 {
            assert_eq!(player.record_draw(Card::Number(v)), DrawOutcome::Scored);
        }
        let banked = player.finalize_round(7, 15);
        assert_eq!(banked, 21 + 15);
        assert_eq!(player.total_score, 36);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(9));
        assert_eq!(player.finalize_round(7, 15), 9);
        assert_eq!(player.finalize_round(7, 15), 0, "Second finalize must not double-count");
        assert_eq!(player.total_score, 9);
    }

    #[test]
    fn test_reset_round_clears_state_and_returns_tableau() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(3));
        player.record_draw(Card::Action(ActionKind::SecondChance));
        player.record_draw(Card::Modifier(ModifierKind::Plus(2)));
        player.finalize_round(7, 15);

        let cards = player.reset_round();
        assert_eq!(cards.len(), 3);
        assert!(player.is_active());
        assert!(!player.has_second_chance);
        assert_eq!(player.round_total, 0);
        assert_eq!(player.distinct_count(), 0);
        assert_eq!(player.total_score, 5, "Cumulative score persists across reset");
    }

    #[test]
    fn test_finalize_again_after_reset_counts() {
        let mut player = PlayerState::new();
        player.record_draw(Card::Number(6));
        player.finalize_round(7, 15);
        player.reset_round();
        player.record_draw(Card::Number(4));
        player.finalize_round(7, 15);
        assert_eq!(player.total_score, 10);
    }
}
