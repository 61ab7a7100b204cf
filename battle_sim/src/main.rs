use clap::Parser;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use battle_shared::player::MAX_PLAYERS;
use battle_sim::{play_game, GameResult};

/// Plays random-bot games and reports how often each seat wins.
#[derive(Parser, Debug)]
#[command(name = "battle_sim")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Players per game
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=6))]
    players: u8,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Completed turns before a game is cancelled
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,
}

#[derive(Clone, Copy, Default, Debug)]
struct Tally {
    wins: [u64; MAX_PLAYERS],
    cancelled: u64,
    failed: u64,
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        for (x, y) in self.wins.iter_mut().zip(other.wins) {
            *x += y;
        }
        self.cancelled += other.cancelled;
        self.failed += other.failed;
        self
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let players = args.players as usize;

    log::info!(
        "playing {} games with {players} players from seed {}",
        args.games,
        args.seed
    );

    let tally = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let seed = args.seed.wrapping_add(i);
            let mut tally = Tally::default();
            match play_game(players, seed, args.max_turns) {
                Ok(GameResult::Winner(winner)) => tally.wins[winner.join_index()] += 1,
                Ok(GameResult::Cancelled) => tally.cancelled += 1,
                Err(err) => {
                    log::error!("game with seed {seed} failed: {err}");
                    tally.failed += 1;
                }
            }
            tally
        })
        .reduce(Tally::default, Tally::merge);

    println!("Games: {}", args.games);
    for (seat, wins) in tally.wins.iter().take(players).enumerate() {
        println!(
            "Seat {}: {} wins ({:.2}%)",
            seat + 1,
            wins,
            *wins as f64 * 100.0 / args.games.max(1) as f64
        );
    }
    println!("Cancelled: {} Failed: {}", tally.cancelled, tally.failed);

    if tally.failed > 0 {
        std::process::exit(1);
    }
}
