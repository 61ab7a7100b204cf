pub mod battle;
pub mod deck;
pub mod error;
pub mod reinforcement;
pub mod setup;
pub mod trade_in;
pub mod turn;

pub use error::{ErrorKind, Result, RulesError};
pub use setup::{begin_first_turn, create_game};
pub use turn::{apply, Action, ActionOutcome, Placement};
