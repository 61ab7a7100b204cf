use battle_shared::{map::TerritoryId, player::PlayerId, state::Phase, CardId, ParseIdError};

pub type Result<T, E = RulesError> = std::result::Result<T, E>;

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum RulesError {
    // Identity
    #[error("territory {0} not found")]
    TerritoryNotFound(String),
    #[error("card {0} not found in player's hand")]
    CardNotFound(CardId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error(transparent)]
    MalformedId(ParseIdError),

    // Setup
    #[error("game must have 2-6 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("player names must be unique, {0} appears twice")]
    DuplicateName(String),

    // Authorization
    #[error("not your turn: {actor} acted but it is {current}'s turn")]
    NotYourTurn { actor: PlayerId, current: PlayerId },

    // State
    #[error("invalid phase: expected {expected}, but game is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },
    #[error("can only end turn during ATTACK or FORTIFY phase, game is in {0}")]
    CannotEndTurn(Phase),
    #[error("game is over")]
    GameOver,
    #[error("no active turn")]
    NoActiveTurn,
    #[error("must place all reinforcements, {0} armies remaining")]
    ReinforcementsRemaining(u32),
    #[error("must trade in cards before ending reinforcement phase")]
    MustTradeCards,

    // Reinforcement
    #[error("no placements provided")]
    NoPlacements,
    #[error("must place at least 1 army on {0}")]
    EmptyPlacement(TerritoryId),
    #[error("not enough reinforcements: trying to place {requested} but only have {remaining}")]
    NotEnoughReinforcements { requested: u32, remaining: u32 },

    // Cards
    #[error("must trade in at least 3 cards, got {0}")]
    InsufficientCards(usize),
    #[error("invalid card set: must be all same type or one of each type")]
    InvalidCardSet,

    // Combat and movement
    #[error("you do not own {0}")]
    NotOwner(TerritoryId),
    #[error("cannot attack your own territory {0}")]
    SelfAttack(TerritoryId),
    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: TerritoryId, to: TerritoryId },
    #[error("{territory} must have at least 2 armies to attack, has {armies}")]
    InsufficientArmies { territory: TerritoryId, armies: u32 },
    #[error("{from} and {to} must belong to the same player")]
    DifferentOwners { from: TerritoryId, to: TerritoryId },
    #[error("must leave at least 1 army in {0}")]
    MustLeaveArmy(TerritoryId),
    #[error("must move at least 1 army")]
    NothingToMove,
    #[error("{from} and {to} are not connected through your territories")]
    NotConnected { from: TerritoryId, to: TerritoryId },
}

impl From<ParseIdError> for RulesError {
    fn from(value: ParseIdError) -> Self {
        match value {
            ParseIdError::Territory(id) => RulesError::TerritoryNotFound(id),
            other => RulesError::MalformedId(other),
        }
    }
}

impl RulesError {
    /// Broad category, for hosts that map errors onto their own status codes.
    pub fn kind(&self) -> ErrorKind {
        use RulesError::*;

        match self {
            TerritoryNotFound(_) | CardNotFound(_) | PlayerNotFound(_) | MalformedId(_) => {
                ErrorKind::NotFound
            }
            NotYourTurn { .. } => ErrorKind::Forbidden,
            InvalidPhase { .. }
            | CannotEndTurn(_)
            | GameOver
            | NoActiveTurn
            | ReinforcementsRemaining(_)
            | MustTradeCards => ErrorKind::State,
            InvalidPlayerCount(_)
            | DuplicateName(_)
            | NoPlacements
            | EmptyPlacement(_)
            | NotEnoughReinforcements { .. }
            | InsufficientCards(_)
            | InvalidCardSet
            | NotOwner(_)
            | SelfAttack(_)
            | NotAdjacent { .. }
            | InsufficientArmies { .. }
            | DifferentOwners { .. }
            | MustLeaveArmy(_)
            | NothingToMove
            | NotConnected { .. } => ErrorKind::Rule,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    State,
    Rule,
}
