use std::collections::HashSet;

use enum_map::EnumMap;
use rand::{seq::SliceRandom, Rng};

use battle_shared::{
    map::TerritoryId,
    player::{ArmyColor, Player, PlayerId, MAX_PLAYERS, MIN_PLAYERS},
    state::{GameState, Phase, TurnState},
    Territory,
};

use crate::{deck, error::Result, reinforcement, RulesError};

/// Total armies each player starts with, including the one per territory.
pub fn initial_armies(player_count: usize) -> Option<u32> {
    match player_count {
        2 => Some(40),
        3 => Some(35),
        4 => Some(30),
        5 => Some(25),
        6 => Some(20),
        _ => None,
    }
}

/// Builds a started game from a roster.
///
/// The first turn has 0 reinforcements; call [`begin_first_turn`] before
/// handing the state to players.
pub fn create_game<R, S>(id: impl Into<String>, names: &[S], rng: &mut R) -> Result<GameState>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
        return Err(RulesError::InvalidPlayerCount(names.len()));
    }

    let names = names.iter().map(|x| x.as_ref().trim()).collect::<Vec<_>>();
    let mut seen = HashSet::new();
    if let Some(duplicate) = names.iter().find(|&&x| !seen.insert(x)) {
        return Err(RulesError::DuplicateName((*duplicate).to_owned()));
    }

    let pool = initial_armies(names.len()).ok_or(RulesError::InvalidPlayerCount(names.len()))?;

    let players = names
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let color = ArmyColor::ALL[i];
            Player::new(PlayerId::from_join_index(i), name, color)
        })
        .collect::<Vec<_>>();

    let turn_order = {
        let mut turn_order = players.iter().map(|x| x.id).collect::<Vec<_>>();
        turn_order.shuffle(rng);
        turn_order
    };

    let mut territories = deal_territories(&turn_order, rng);
    for player in &players {
        distribute_armies(&mut territories, player.id, pool, rng);
    }

    let first = turn_order[0];
    let mut state = GameState::new(id, names[0]);
    state.phase = Phase::Reinforce;
    state.players = players;
    state.turn_order = turn_order;
    state.current_player_index = 0;
    state.territories = territories;
    state.deck = deck::create_deck(rng);
    state.turn = Some(TurnState::new(first, 0));

    log::info!(
        "created game {} with {} players, turn order {:?}",
        state.id,
        state.players.len(),
        state.turn_order
    );

    Ok(state)
}

/// Computes the opening player's reinforcements.
pub fn begin_first_turn(state: &mut GameState) -> Result<()> {
    let player = state.current_player().ok_or(RulesError::NoActiveTurn)?;
    let reinforcements = reinforcement::reinforcements(state, player);
    state.turn = Some(TurnState::new(player, reinforcements));
    state.touch();

    log::debug!("{player} opens with {reinforcements} reinforcements");
    Ok(())
}

fn deal_territories<R: Rng + ?Sized>(
    turn_order: &[PlayerId],
    rng: &mut R,
) -> EnumMap<TerritoryId, Territory> {
    let mut order = TerritoryId::all().collect::<Vec<_>>();
    order.shuffle(rng);

    let mut territories = EnumMap::from_fn(Territory::new);
    for (i, id) in order.into_iter().enumerate() {
        let territory = &mut territories[id];
        territory.occupier = Some(turn_order[i % turn_order.len()]);
        territory.armies = 1;
    }

    territories
}

fn distribute_armies<R: Rng + ?Sized>(
    territories: &mut EnumMap<TerritoryId, Territory>,
    player: PlayerId,
    pool: u32,
    rng: &mut R,
) {
    let owned = territories
        .iter()
        .filter(|(_, x)| x.is_owned_by(player))
        .map(|(id, _)| id)
        .collect::<Vec<_>>();

    let extra = pool.saturating_sub(owned.len() as u32);
    for _ in 0..extra {
        if let Some(&id) = owned.choose(rng) {
            territories[id].armies += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::*;

    fn rng(seed: u64) -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(seed)
    }

    #[test]
    fn two_player_game_splits_map_evenly() {
        let state = create_game("g", &["Alice", "Bob"], &mut rng(1)).unwrap();

        assert_eq!(state.phase, Phase::Reinforce);
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.deck.len(), 42);

        for player in &state.players {
            assert_eq!(state.territory_count(player.id), 21);
            assert_eq!(state.army_count(player.id), 40);
        }

        let turn = state.turn.unwrap();
        assert_eq!(turn.player, state.turn_order[0]);
        assert_eq!(turn.reinforcements_remaining, 0);
        assert!(!turn.conquered_territory);
    }

    #[test]
    fn every_player_count_gets_its_army_pool() {
        let names = ["A", "B", "C", "D", "E", "F"];
        for count in 2..=6 {
            let state = create_game("g", &names[..count], &mut rng(count as u64)).unwrap();
            let pool = initial_armies(count).unwrap();

            for player in &state.players {
                let owned = state.territory_count(player.id);
                assert!(owned == 42 / count || owned == 42usize.div_ceil(count));
                assert_eq!(state.army_count(player.id), pool);
            }

            assert!(state.territories.values().all(|x| x.occupier.is_some() && x.armies >= 1));
        }
    }

    #[test]
    fn ids_and_colors_follow_join_order() {
        let state = create_game("g", &["Ann", "Ben", "Cat"], &mut rng(3)).unwrap();

        let ids = state.players.iter().map(|x| x.id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids, ["player-1", "player-2", "player-3"]);

        let colors = state.players.iter().map(|x| x.color).collect::<Vec<_>>();
        assert_eq!(colors, [ArmyColor::Red, ArmyColor::Blue, ArmyColor::Green]);

        let mut order = state.turn_order.clone();
        order.sort();
        assert_eq!(order, state.players.iter().map(|x| x.id).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_bad_rosters() {
        assert_eq!(
            create_game("g", &["Solo"], &mut rng(0)).unwrap_err(),
            RulesError::InvalidPlayerCount(1)
        );
        assert_eq!(
            create_game("g", &["A", "B", "C", "D", "E", "F", "G"], &mut rng(0)).unwrap_err(),
            RulesError::InvalidPlayerCount(7)
        );
        assert_eq!(
            create_game("g", &["Alice", "Bob", "Alice "], &mut rng(0)).unwrap_err(),
            RulesError::DuplicateName("Alice".to_owned())
        );
        assert!(create_game("g", &["alice", "Alice"], &mut rng(0)).is_ok());
    }

    #[test]
    fn first_turn_gets_computed_reinforcements() {
        let mut state = create_game("g", &["Alice", "Bob"], &mut rng(5)).unwrap();
        begin_first_turn(&mut state).unwrap();

        let turn = state.turn.unwrap();
        assert_eq!(turn.player, state.turn_order[0]);
        assert_eq!(
            turn.reinforcements_remaining,
            reinforcement::reinforcements(&state, turn.player)
        );
        assert!(turn.reinforcements_remaining >= 7);
    }
}
