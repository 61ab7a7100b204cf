use battle_sim::{play_game, GameResult};

#[test]
fn every_table_size_plays_cleanly() {
    for players in 2..=6 {
        for seed in 0..3 {
            let result = play_game(players, seed, 300);
            match result {
                Ok(GameResult::Winner(winner)) => assert!(winner.join_index() < players),
                Ok(GameResult::Cancelled) => {}
                Err(err) => panic!("{players} players, seed {seed}: {err}"),
            }
        }
    }
}

#[test]
fn same_seed_same_game() {
    assert_eq!(play_game(4, 99, 200), play_game(4, 99, 200));
}

#[test]
fn zero_turn_cap_cancels_immediately() {
    assert_eq!(play_game(2, 5, 0), Ok(GameResult::Cancelled));
}

#[test]
fn some_games_reach_a_winner() {
    let winners = (0..10)
        .filter_map(|seed| play_game(2, seed, 2000).ok())
        .filter(|x| matches!(x, GameResult::Winner(_)))
        .count();

    assert!(winners > 0);
}
