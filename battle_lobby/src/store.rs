use std::collections::HashMap;

use battle_shared::state::GameState;

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum StoreError {
    #[error("game {0} already exists")]
    AlreadyExists(String),
    #[error("game {0} not found")]
    NotFound(String),
}

/// Keyed storage for games. The rules engine never touches it.
pub trait GameStore {
    fn create(&mut self, id: &str, state: GameState) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Option<&GameState>;

    fn update(&mut self, id: &str, state: GameState) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Option<GameState>;

    fn list(&self) -> Vec<&GameState>;
}

#[derive(Default, Debug)]
pub struct MemoryStore {
    games: HashMap<String, GameState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn create(&mut self, id: &str, state: GameState) -> Result<(), StoreError> {
        if self.games.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_owned()));
        }

        self.games.insert(id.to_owned(), state);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&GameState> {
        self.games.get(id)
    }

    fn update(&mut self, id: &str, state: GameState) -> Result<(), StoreError> {
        let slot = self
            .games
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        *slot = state;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Option<GameState> {
        self.games.remove(id)
    }

    /// Oldest first.
    fn list(&self) -> Vec<&GameState> {
        let mut games = self.games.values().collect::<Vec<_>>();
        games.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        games
    }
}
