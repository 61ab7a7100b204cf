use battle_shared::{map::Continent, player::PlayerId, state::GameState, CardId};

use crate::{error::Result, trade_in, RulesError};

pub const MIN_TERRITORY_BONUS: u32 = 3;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReinforcementBreakdown {
    pub territories_held: u32,
    pub territory_bonus: u32,
    pub continent_bonus: u32,
    pub continents_held: Vec<Continent>,
    pub total: u32,
}

/// What the current player sees while reinforcing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReinforcementInfo {
    pub player: PlayerId,
    pub breakdown: ReinforcementBreakdown,
    pub reinforcements_remaining: u32,
    pub can_trade: bool,
    pub must_trade: bool,
    pub possible_trade_sets: Vec<Vec<CardId>>,
}

pub fn territory_bonus(territories_held: usize) -> u32 {
    MIN_TERRITORY_BONUS.max(territories_held as u32 / 3)
}

pub fn continents_held(state: &GameState, player: PlayerId) -> Vec<Continent> {
    Continent::ALL
        .into_iter()
        .filter(|c| {
            c.iter_territories()
                .all(|t| state.territories[t].is_owned_by(player))
        })
        .collect()
}

pub fn continent_bonus(state: &GameState, player: PlayerId) -> u32 {
    continents_held(state, player)
        .into_iter()
        .map(Continent::bonus)
        .sum()
}

pub fn breakdown(state: &GameState, player: PlayerId) -> ReinforcementBreakdown {
    let territories_held = state.territory_count(player);
    let territory_bonus = territory_bonus(territories_held);
    let continents_held = continents_held(state, player);
    let continent_bonus = continents_held.iter().copied().map(Continent::bonus).sum();

    ReinforcementBreakdown {
        territories_held: territories_held as u32,
        territory_bonus,
        continent_bonus,
        continents_held,
        total: territory_bonus + continent_bonus,
    }
}

pub fn reinforcements(state: &GameState, player: PlayerId) -> u32 {
    breakdown(state, player).total
}

pub fn info(state: &GameState) -> Result<ReinforcementInfo> {
    let turn = state.turn.ok_or(RulesError::NoActiveTurn)?;
    let hand = &state
        .player(turn.player)
        .ok_or(RulesError::PlayerNotFound(turn.player))?
        .cards;

    Ok(ReinforcementInfo {
        player: turn.player,
        breakdown: breakdown(state, turn.player),
        reinforcements_remaining: turn.reinforcements_remaining,
        can_trade: trade_in::can_trade_in(hand),
        must_trade: trade_in::must_trade_in(hand),
        possible_trade_sets: trade_in::possible_trade_sets(hand),
    })
}
