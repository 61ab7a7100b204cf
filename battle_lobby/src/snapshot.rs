use std::collections::HashSet;

use battle_shared::state::{GameState, Phase};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(&'static str),
}

pub fn to_json(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

pub fn to_json_pretty(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses a snapshot and rejects states the rules engine could never produce.
pub fn from_json(json: &str) -> Result<GameState, SnapshotError> {
    let state: GameState = serde_json::from_str(json)?;
    check(&state)?;
    Ok(state)
}

fn check(state: &GameState) -> Result<(), SnapshotError> {
    use SnapshotError::Inconsistent;

    if state.players.is_empty() {
        return Err(Inconsistent("no players"));
    }

    let players = state.players.iter().map(|x| x.id).collect::<HashSet<_>>();
    let order = state.turn_order.iter().copied().collect::<HashSet<_>>();
    if players.len() != state.players.len()
        || order.len() != state.turn_order.len()
        || players != order
    {
        return Err(Inconsistent("turn order is not a permutation of the players"));
    }

    if state.current_player_index >= state.turn_order.len() {
        return Err(Inconsistent("current player index out of range"));
    }

    let owners_known = state
        .territories
        .values()
        .filter_map(|x| x.occupier)
        .all(|x| players.contains(&x));
    if !owners_known {
        return Err(Inconsistent("territory held by an unknown player"));
    }

    if state.phase != Phase::Setup {
        if state.turn.is_none() {
            return Err(Inconsistent("started game without a turn"));
        }

        if state.territories.values().any(|x| x.occupier.is_none()) {
            return Err(Inconsistent("started game with unoccupied territory"));
        }
    }

    Ok(())
}
