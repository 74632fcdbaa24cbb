pub mod deck;
pub mod player;
pub mod state;

pub use deck::{Deck, DeckError};
pub use player::{DrawOutcome, PlayerState, PlayerStatus};
pub use state::{Action, GameConfig, GameError, GamePhase, GameState, StepResult};
