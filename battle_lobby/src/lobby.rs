use std::collections::HashMap;

use rand::Rng;

use battle_engine::{begin_first_turn, create_game, turn, Action, ActionOutcome, RulesError};
use battle_shared::{
    player::{ArmyColor, Player, PlayerId, MAX_PLAYERS, MIN_PLAYERS},
    state::{GameState, Phase},
};

use crate::store::{GameStore, StoreError};

pub const MAX_NAME_LENGTH: usize = 20;
pub const CODE_LENGTH: usize = 4;
/// No `I`, `O`, `0` or `1`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("player name is required")]
    NameRequired,
    #[error("player name must be 20 characters or less")]
    NameTooLong,
    #[error("game {0} not found")]
    GameNotFound(String),
    #[error("game has already started")]
    AlreadyStarted,
    #[error("game is full (max 6 players)")]
    GameFull,
    #[error("player name {0} already taken")]
    NameTaken(String),
    #[error("only the game creator can start the game")]
    NotCreator,
    #[error("need at least 2 players to start")]
    NotEnoughPlayers,
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    Waiting,
    InProgress,
    Finished,
}

impl GameStatus {
    pub fn of(phase: Phase) -> Self {
        match phase {
            Phase::Setup => GameStatus::Waiting,
            Phase::GameOver => GameStatus::Finished,
            _ => GameStatus::InProgress,
        }
    }
}

/// Lobby listing entry.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub struct GameInfo {
    pub id: String,
    pub code: String,
    pub creator_name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub status: GameStatus,
    pub phase: Phase,
    pub current_player_name: Option<String>,
    pub winner_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CreatedGame {
    pub id: String,
    pub code: String,
    pub state: GameState,
}

pub struct Lobby<S, R> {
    store: S,
    codes: HashMap<String, String>,
    rng: R,
}

impl<S: GameStore, R: Rng> Lobby<S, R> {
    pub fn new(store: S, rng: R) -> Self {
        Self {
            store,
            codes: HashMap::new(),
            rng,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_game(&mut self, creator: &str) -> Result<CreatedGame, LobbyError> {
        let name = validate_name(creator)?;

        let id = self.new_game_id();
        let code = self.new_code();
        let state = GameState::new(id.clone(), name);

        self.store.create(&id, state.clone())?;
        self.codes.insert(id.clone(), code.clone());

        log::info!("{name} created game {id} with code {code}");
        Ok(CreatedGame { id, code, state })
    }

    pub fn join_game(&mut self, id: &str, name: &str) -> Result<GameState, LobbyError> {
        let name = validate_name(name)?;
        let mut state = self.game(id)?.clone();

        if state.phase != Phase::Setup {
            return Err(LobbyError::AlreadyStarted);
        }

        if state.players.len() >= MAX_PLAYERS {
            return Err(LobbyError::GameFull);
        }

        let lowercase = name.to_lowercase();
        if state.players.iter().any(|x| x.name.to_lowercase() == lowercase) {
            return Err(LobbyError::NameTaken(name.to_owned()));
        }

        let index = state.players.len();
        let color = ArmyColor::for_join_index(index).ok_or(LobbyError::GameFull)?;
        let player = Player::new(PlayerId::from_join_index(index), name, color);

        log::info!("{name} joined game {id} as {}", player.id);
        state.turn_order.push(player.id);
        state.players.push(player);
        state.touch();

        self.store.update(id, state.clone())?;
        Ok(state)
    }

    pub fn start_game(&mut self, id: &str, requester: PlayerId) -> Result<GameState, LobbyError> {
        let lobby = self.game(id)?;

        if lobby.phase != Phase::Setup {
            return Err(LobbyError::AlreadyStarted);
        }

        if !requester.is_creator() {
            return Err(LobbyError::NotCreator);
        }

        if lobby.players.len() < MIN_PLAYERS {
            return Err(LobbyError::NotEnoughPlayers);
        }

        let names = lobby.players.iter().map(|x| x.name.clone()).collect::<Vec<_>>();
        let created_at = lobby.created_at;

        let mut state = create_game(id, &names, &mut self.rng)?;
        begin_first_turn(&mut state)?;
        state.created_at = created_at;

        self.store.update(id, state.clone())?;
        log::info!("game {id} started with {} players", names.len());
        Ok(state)
    }

    pub fn game(&self, id: &str) -> Result<&GameState, LobbyError> {
        self.store
            .get(id)
            .ok_or_else(|| LobbyError::GameNotFound(id.to_owned()))
    }

    pub fn game_by_code(&self, code: &str) -> Result<&GameState, LobbyError> {
        let code = code.trim().to_uppercase();
        let id = self
            .codes
            .iter()
            .find(|(_, x)| **x == code)
            .map(|(id, _)| id)
            .ok_or_else(|| LobbyError::GameNotFound(code.clone()))?;
        self.game(id)
    }

    pub fn info(&self, id: &str) -> Result<GameInfo, LobbyError> {
        let state = self.game(id)?;
        Ok(self.summarize(state))
    }

    pub fn list_games(&self) -> Vec<GameInfo> {
        self.store
            .list()
            .into_iter()
            .map(|x| self.summarize(x))
            .collect()
    }

    pub fn delete_game(&mut self, id: &str) -> Result<GameState, LobbyError> {
        self.codes.remove(id);
        self.store
            .delete(id)
            .ok_or_else(|| LobbyError::GameNotFound(id.to_owned()))
    }

    /// Runs `f` against a copy of the game and stores the copy only if `f`
    /// succeeds.
    pub fn act<T, F>(&mut self, id: &str, f: F) -> Result<T, LobbyError>
    where
        F: FnOnce(&mut GameState, &mut R) -> battle_engine::Result<T>,
    {
        let mut state = self.game(id)?.clone();
        let value = f(&mut state, &mut self.rng)?;
        self.store.update(id, state)?;
        Ok(value)
    }

    pub fn apply(
        &mut self,
        id: &str,
        actor: PlayerId,
        action: Action,
    ) -> Result<ActionOutcome, LobbyError> {
        self.act(id, |state, rng| turn::apply(state, actor, action, rng))
    }

    fn summarize(&self, state: &GameState) -> GameInfo {
        let name_of = |id: PlayerId| state.player(id).map(|x| x.name.clone());

        GameInfo {
            id: state.id.clone(),
            code: self.codes.get(&state.id).cloned().unwrap_or_default(),
            creator_name: state
                .players
                .first()
                .map(|x| x.name.clone())
                .unwrap_or_default(),
            player_count: state.players.len(),
            max_players: MAX_PLAYERS,
            status: GameStatus::of(state.phase),
            phase: state.phase,
            current_player_name: state.turn.and_then(|x| name_of(x.player)),
            winner_name: state.winner.and_then(name_of),
        }
    }

    fn new_game_id(&mut self) -> String {
        loop {
            let bits: u128 = self.rng.gen();
            let hex = format!("{bits:032x}");
            let id = format!(
                "{}-{}-{}-{}-{}",
                &hex[..8],
                &hex[8..12],
                &hex[12..16],
                &hex[16..20],
                &hex[20..]
            );

            if self.store.get(&id).is_none() {
                return id;
            }
        }
    }

    fn new_code(&mut self) -> String {
        loop {
            let code = (0..CODE_LENGTH)
                .map(|_| CODE_ALPHABET[self.rng.gen_range(0..CODE_ALPHABET.len())] as char)
                .collect::<String>();

            if !self.codes.values().any(|x| *x == code) {
                return code;
            }
        }
    }
}

/// Trims and checks a player name.
pub fn validate_name(name: &str) -> Result<&str, LobbyError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LobbyError::NameRequired);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(LobbyError::NameTooLong);
    }

    Ok(trimmed)
}
