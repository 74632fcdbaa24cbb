use crate::card::{Card, CardSetConfig};
use crate::game::deck::{Deck, DeckError};
use crate::game::player::{DrawOutcome, PlayerState, PlayerStatus};
use crate::rng::GameRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("illegal action: {0}")]
    IllegalAction(String),
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// The two choices open to the player whose turn it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Draw another card this round
    Hit,
    /// Freeze the current round score without drawing further
    Stay,
}

/// Persistent game phases. Round progression (in progress / over) is
/// transient within a single `step` call and reported via `StepResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingAction,
    GameOver,
}

/// Game parameters. The Flip 7 bonus value and the distinct-set size that
/// triggers it are configuration, not constants.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub players: usize,
    pub target_score: u32,
    /// Distinct number values required for the Flip 7 bonus
    pub flip7_size: usize,
    /// Bonus points granted for a full distinct set
    pub flip7_bonus: u32,
    pub card_set: CardSetConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            players: 2,
            target_score: 100,
            flip7_size: 7,
            flip7_bonus: 15,
            card_set: CardSetConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.players == 0 {
            return Err(GameError::InvalidConfiguration(
                "at least one player is required".to_string(),
            ));
        }
        if self.target_score == 0 {
            return Err(GameError::InvalidConfiguration(
                "target score must be positive".to_string(),
            ));
        }
        if self.card_set.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "card set is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// What one `step` call did: the acting seat, every card drawn during the
/// step (Flip-Three forced draws included), the flags raised, and the
/// scores after any round finalization.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub seat: usize,
    pub round: u32,
    pub drawn: Vec<Card>,
    pub busted: bool,
    pub froze: bool,
    /// The acting player holds a full distinct set of number values
    pub flip7: bool,
    pub round_over: bool,
    pub game_over: bool,
    /// Cumulative scores after this step
    pub scores: Vec<u32>,
    pub winner: Option<usize>,
}

/// Turn, round, and game orchestration. Exactly one player is eligible to
/// act between `step` calls; the round ends when every player is busted or
/// frozen, and the game ends when a cumulative score reaches the target.
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub deck: Deck,
    /// Seat of the player to act next
    pub current: usize,
    /// 1-based round counter
    pub round: u32,
    pub phase: GamePhase,
    config: GameConfig,
    round_start_seat: usize,
}

impl GameState {
    /// Create a game with a freshly shuffled deck
    pub fn new(config: GameConfig, rng: GameRng) -> Result<Self, GameError> {
        config.validate()?;
        let deck = Deck::new(&config.card_set, rng);
        Ok(Self::assemble(config, deck))
    }

    /// Create a game around a prepared deck, for deterministic tests and
    /// replays
    pub fn with_deck(config: GameConfig, deck: Deck) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::assemble(config, deck))
    }

    fn assemble(config: GameConfig, deck: Deck) -> Self {
        let players = (0..config.players).map(|_| PlayerState::new()).collect();
        GameState {
            players,
            deck,
            current: 0,
            round: 1,
            phase: GamePhase::AwaitingAction,
            config,
            round_start_seat: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Winner after game over: highest cumulative score, ties broken by the
    /// earliest seat
    pub fn winner(&self) -> Option<usize> {
        if self.phase == GamePhase::GameOver {
            Some(self.leading_seat())
        } else {
            None
        }
    }

    fn leading_seat(&self) -> usize {
        let mut best = 0;
        for (seat, player) in self.players.iter().enumerate().skip(1) {
            if player.total_score > self.players[best].total_score {
                best = seat;
            }
        }
        best
    }

    /// Advance exactly one player decision.
    ///
    /// Eligibility is validated before any state changes, so a failed call
    /// leaves the game exactly as it was. Round finalization and the start
    /// of the next round (or game over) happen inside the call that ends
    /// the round.
    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        if self.phase == GamePhase::GameOver {
            return Err(GameError::IllegalAction("the game is over".to_string()));
        }
        let seat = self.current;
        if !self.players[seat].is_active() {
            return Err(GameError::IllegalAction(format!(
                "player {} is {:?} and cannot act",
                seat, self.players[seat].status
            )));
        }

        let mut result = StepResult {
            seat,
            round: self.round,
            drawn: Vec::new(),
            busted: false,
            froze: false,
            flip7: false,
            round_over: false,
            game_over: false,
            scores: Vec::new(),
            winner: None,
        };

        match action {
            Action::Stay => {
                self.players[seat].status = PlayerStatus::Frozen;
                result.froze = true;
            }
            Action::Hit => self.resolve_hit(seat, &mut result)?,
        }

        let player = &self.players[seat];
        result.flip7 = player.status != PlayerStatus::Busted
            && player.distinct_count() >= self.config.flip7_size;

        if self.players.iter().any(PlayerState::is_active) {
            self.advance_turn();
        } else {
            self.finish_round(&mut result);
        }

        result.scores = self.players.iter().map(|p| p.total_score).collect();
        Ok(result)
    }

    /// One voluntary draw. A Flip Three owes three more forced draws,
    /// resolved here as an explicit loop that exits the moment the player
    /// stops being active; nested Flip Threes accumulate.
    fn resolve_hit(&mut self, seat: usize, result: &mut StepResult) -> Result<(), GameError> {
        let mut pending = 1u32;
        while pending > 0 && self.players[seat].is_active() {
            pending -= 1;
            let card = self.deck.draw()?;
            result.drawn.push(card);
            match self.players[seat].record_draw(card) {
                DrawOutcome::Scored
                | DrawOutcome::SecondChanceHeld
                | DrawOutcome::Modified => {}
                DrawOutcome::Busted(card) => {
                    self.deck.discard(card);
                    result.busted = true;
                }
                DrawOutcome::SecondChanceUsed { duplicate, spent } => {
                    self.deck.discard(duplicate);
                    self.deck.discard(spent);
                }
                DrawOutcome::Frozen(card) => {
                    self.deck.discard(card);
                    result.froze = true;
                }
                DrawOutcome::FlipThree(card) => {
                    self.deck.discard(card);
                    pending += 3;
                }
            }
        }
        Ok(())
    }

    /// Move `current` to the next active seat, wrapping and skipping busted
    /// or frozen players. Only called while at least one player is active.
    fn advance_turn(&mut self) {
        let n = self.players.len();
        for offset in 1..=n {
            let seat = (self.current + offset) % n;
            if self.players[seat].is_active() {
                self.current = seat;
                return;
            }
        }
    }

    /// All players are busted or frozen: finalize scores, return every
    /// in-play card to the discard pile, then either end the game or start
    /// the next round with the start seat rotated one to the left.
    fn finish_round(&mut self, result: &mut StepResult) {
        result.round_over = true;

        for player in &mut self.players {
            player.finalize_round(self.config.flip7_size, self.config.flip7_bonus);
        }
        for seat in 0..self.players.len() {
            for card in self.players[seat].reset_round() {
                self.deck.discard(card);
            }
        }

        let target_reached = self
            .players
            .iter()
            .any(|p| p.total_score >= self.config.target_score);
        if target_reached {
            self.phase = GamePhase::GameOver;
            result.game_over = true;
            result.winner = Some(self.leading_seat());
        } else {
            self.round += 1;
            self.round_start_seat = (self.round_start_seat + 1) % self.players.len();
            self.current = self.round_start_seat;
        }
    }
}
