use battle_engine::{
    battle, begin_first_turn, create_game, turn, Action, ActionOutcome, ErrorKind, Placement,
    RulesError,
};
use battle_shared::{map::TerritoryId, player::PlayerId, state::Phase};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn parse_territory(id: &str) -> battle_engine::Result<TerritoryId> {
    Ok(id.parse::<TerritoryId>()?)
}

#[test]
fn two_player_game_starts_ready_to_reinforce() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let mut state = create_game("game-1", &["Alice", "Bob"], &mut rng).unwrap();

    assert_eq!(state.phase, Phase::Reinforce);
    assert_eq!(state.current_player_index, 0);
    for player in &state.players {
        assert_eq!(state.territory_count(player.id), 21);
        assert_eq!(state.army_count(player.id), 40);
    }

    begin_first_turn(&mut state).unwrap();
    let turn = state.turn.unwrap();
    let owned = state.territory_count(turn.player) as u32;
    assert!(turn.reinforcements_remaining >= 3.max(owned / 3));
}

#[test]
fn unknown_territory_ids_are_not_found() {
    let err = parse_territory("atlantis").unwrap_err();
    assert_eq!(err, RulesError::TerritoryNotFound("atlantis".to_owned()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(parse_territory("alaska"), Ok(TerritoryId::Alaska));
}

#[test]
fn alaska_cannot_attack_argentina() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let mut state = create_game("game-1", &["Alice", "Bob"], &mut rng).unwrap();

    let alaska = parse_territory("alaska").unwrap();
    let argentina = parse_territory("argentina").unwrap();
    state.territories[alaska].occupier = Some(state.turn_order[0]);
    state.territories[alaska].armies = 5;
    state.territories[argentina].occupier = Some(state.turn_order[1]);

    let err = battle::validate_attack(&state, alaska, argentina, state.turn_order[0]).unwrap_err();
    assert_eq!(
        err,
        RulesError::NotAdjacent {
            from: alaska,
            to: argentina
        }
    );
    assert_eq!(err.to_string(), "alaska and argentina are not adjacent");
}

#[test]
fn zero_army_move_is_a_no_op() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(2);
    let mut state = create_game("game-1", &["Alice", "Bob"], &mut rng).unwrap();
    let before = state.territories.clone();

    let from = TerritoryId::Alaska;
    let to = TerritoryId::Alberta;
    let owner = state.territories[from].occupier;
    state.territories[to].occupier = owner;
    let before_to = state.territories[to].clone();

    battle::move_armies_after_conquest(&mut state, from, to, 0).unwrap();
    assert_eq!(state.territories[from], before[from]);
    assert_eq!(state.territories[to], before_to);
}

#[test]
fn full_turn_cycle_through_apply() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(3);
    let mut state = create_game("game-1", &["Alice", "Bob", "Cat"], &mut rng).unwrap();
    begin_first_turn(&mut state).unwrap();

    let first = state.turn_order[0];
    let other = state.turn_order[1];
    let reinforcements = state.turn.unwrap().reinforcements_remaining;
    let target = state.territories_owned_by(first)[0];

    assert_eq!(
        turn::apply(&mut state, other, Action::EndReinforcement, &mut rng),
        Err(RulesError::NotYourTurn {
            actor: other,
            current: first
        })
    );

    let outcome = turn::apply(
        &mut state,
        first,
        Action::PlaceReinforcements(vec![Placement::new(target, reinforcements)]),
        &mut rng,
    )
    .unwrap();
    assert_eq!(outcome, ActionOutcome::Placed { remaining: 0 });

    for action in [Action::EndReinforcement, Action::EndAttack] {
        turn::apply(&mut state, first, action, &mut rng).unwrap();
    }
    assert_eq!(state.phase, Phase::Fortify);

    let outcome = turn::apply(&mut state, first, Action::EndTurn, &mut rng).unwrap();
    assert!(matches!(outcome, ActionOutcome::TurnEnded { next, .. } if next == other));
    assert_eq!(state.phase, Phase::Reinforce);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.turn.unwrap().player, other);
}

#[test]
fn conquering_the_last_territory_wins() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(4);
    let mut state = create_game("game-1", &["Alice", "Bob"], &mut rng).unwrap();
    let attacker = state.turn_order[0];
    let defender = state.turn_order[1];

    for territory in state.territories.values_mut() {
        territory.occupier = Some(attacker);
        territory.armies = 1;
    }
    state.territories[TerritoryId::Ukraine].armies = 60;
    state.territories[TerritoryId::Ural].occupier = Some(defender);
    state.phase = Phase::Attack;

    let report = turn::auto_attack(
        &mut state,
        attacker,
        TerritoryId::Ukraine,
        TerritoryId::Ural,
        &mut rng,
    )
    .unwrap();

    assert!(report.conquered);
    assert_eq!(report.eliminated, [defender]);
    assert_eq!(state.winner, Some(attacker));
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.territory_count(attacker), 42);
    assert!(state
        .player(defender)
        .is_some_and(|x| x.eliminated && x.cards.is_empty()));

    let err = turn::end_turn(&mut state, attacker).unwrap_err();
    assert_eq!(err, RulesError::GameOver);
    assert_eq!(err.kind(), ErrorKind::State);
}

#[test]
fn player_ids_come_from_join_order() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(5);
    let state = create_game("game-1", &["  Alice ", "Bob"], &mut rng).unwrap();

    assert_eq!(state.players[0].name, "Alice");
    assert_eq!(state.players[0].id, PlayerId::new(1).unwrap());
    assert_eq!(state.players[1].id.to_string(), "player-2");
}
