use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use battle_engine::{
    begin_first_turn, create_game, trade_in, turn, Action, ActionOutcome, Placement, RulesError,
};
use battle_shared::{
    map::TerritoryId,
    player::PlayerId,
    state::{GameState, Phase},
    CARD_COUNT,
};

pub const MAX_ATTACKS_PER_TURN: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameResult {
    Winner(PlayerId),
    Cancelled,
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Plays legal but aimless moves.
pub struct RandomBot<R: Rng> {
    rng: R,
    attacks: usize,
    fortified: bool,
    pending_move: Option<(TerritoryId, TerritoryId)>,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            attacks: 0,
            fortified: false,
            pending_move: None,
        }
    }

    pub fn next_action(&mut self, state: &GameState) -> Action {
        let Some(me) = state.current_player() else {
            return Action::EndTurn;
        };

        match state.phase {
            Phase::Reinforce => self.reinforce(state, me),
            Phase::Attack => self.attack(state, me),
            Phase::Fortify => self.fortify(state, me),
            Phase::Setup | Phase::GameOver => Action::EndTurn,
        }
    }

    pub fn observe(&mut self, action: &Action, outcome: &ActionOutcome) {
        match (action, outcome) {
            (Action::AutoAttack { from, to }, ActionOutcome::Attacked(report))
                if report.conquered =>
            {
                self.pending_move = Some((*from, *to));
            }
            (_, ActionOutcome::TurnEnded { .. }) => {
                self.attacks = 0;
                self.fortified = false;
                self.pending_move = None;
            }
            _ => {}
        }
    }

    fn reinforce(&mut self, state: &GameState, me: PlayerId) -> Action {
        let hand = state.player(me).map_or(&[][..], |x| x.cards.as_slice());
        if let Some(set) = trade_in::recommended_trade_set(hand) {
            return Action::TradeCards(set);
        }

        let remaining = state.turn.map_or(0, |x| x.reinforcements_remaining);
        if remaining == 0 {
            return Action::EndReinforcement;
        }

        let mut targets = border_territories(state, me);
        if targets.is_empty() {
            targets = state.territories_owned_by(me);
        }
        targets.shuffle(&mut self.rng);
        targets.truncate(3);

        let mut armies = vec![0; targets.len()];
        for _ in 0..remaining {
            armies[self.rng.gen_range(0..targets.len())] += 1;
        }

        let placements = targets
            .into_iter()
            .zip(armies)
            .filter(|&(_, x)| x > 0)
            .map(|(territory, x)| Placement::new(territory, x))
            .collect();
        Action::PlaceReinforcements(placements)
    }

    fn attack(&mut self, state: &GameState, me: PlayerId) -> Action {
        if let Some((from, to)) = self.pending_move.take() {
            let count = state.territories[from].armies.saturating_sub(1);
            if count > 0 && state.territories[to].is_owned_by(me) {
                return Action::MoveArmies { from, to, count };
            }
        }

        if self.attacks < MAX_ATTACKS_PER_TURN {
            let candidates = state
                .territories_owned_by(me)
                .into_iter()
                .flat_map(|from| from.neighbours().iter().map(move |&to| (from, to)))
                .filter(|&(from, to)| {
                    let (source, target) = (&state.territories[from], &state.territories[to]);
                    !target.is_owned_by(me) && source.armies >= 2 && source.armies > target.armies
                })
                .collect::<Vec<_>>();

            if let Some(&(from, to)) = candidates.choose(&mut self.rng) {
                self.attacks += 1;
                return Action::AutoAttack { from, to };
            }
        }

        Action::EndAttack
    }

    fn fortify(&mut self, state: &GameState, me: PlayerId) -> Action {
        if self.fortified || !self.rng.gen_bool(0.5) {
            return Action::EndTurn;
        }
        self.fortified = true;

        let borders = border_territories(state, me);
        let interior = state
            .territories_owned_by(me)
            .into_iter()
            .filter(|x| state.territories[*x].armies > 1 && !borders.contains(x))
            .collect::<Vec<_>>();

        let Some(&from) = interior.choose(&mut self.rng) else {
            return Action::EndTurn;
        };

        let reachable = borders
            .into_iter()
            .filter(|&to| turn::is_connected(state, me, from, to))
            .collect::<Vec<_>>();

        match reachable.choose(&mut self.rng) {
            Some(&to) => Action::Fortify {
                from,
                to,
                count: state.territories[from].armies - 1,
            },
            None => Action::EndTurn,
        }
    }
}

/// Owned territories with at least one enemy neighbour.
pub fn border_territories(state: &GameState, player: PlayerId) -> Vec<TerritoryId> {
    state
        .territories_owned_by(player)
        .into_iter()
        .filter(|x| {
            x.neighbours()
                .iter()
                .any(|&y| !state.territories[y].is_owned_by(player))
        })
        .collect()
}

/// Plays one seeded game between random bots. `max_turns` counts completed
/// turns across all players.
pub fn play_game(player_count: usize, seed: u64, max_turns: usize) -> Result<GameResult, SimError> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let names = (1..=player_count)
        .map(|x| format!("Bot {x}"))
        .collect::<Vec<_>>();

    let mut state = create_game(format!("sim-{seed}"), &names, &mut rng)?;
    begin_first_turn(&mut state)?;
    check_invariants(&state)?;

    let mut bots = state
        .players
        .iter()
        .map(|_| RandomBot::new(Xoshiro256StarStar::seed_from_u64(rng.gen())))
        .collect::<Vec<_>>();

    let mut turns = 0;
    loop {
        if let Some(winner) = state.winner {
            log::info!("{} won game {} after {turns} turns", winner, state.id);
            return Ok(GameResult::Winner(winner));
        }

        if turns >= max_turns {
            log::info!("game {} cancelled after {turns} turns", state.id);
            return Ok(GameResult::Cancelled);
        }

        let actor = state.current_player().ok_or(RulesError::NoActiveTurn)?;
        let bot = &mut bots[actor.join_index()];
        let action = bot.next_action(&state);
        let outcome = turn::apply(&mut state, actor, action.clone(), &mut rng)?;
        check_invariants(&state)?;

        if matches!(outcome, ActionOutcome::TurnEnded { .. }) {
            turns += 1;
        }
        bot.observe(&action, &outcome);
    }
}

/// Conditions that hold between any two actions of a started game.
pub fn check_invariants(state: &GameState) -> Result<(), SimError> {
    let fail = |x: String| Err(SimError::Invariant(x));

    for (id, territory) in &state.territories {
        let Some(owner) = territory.occupier else {
            return fail(format!("{id} is unoccupied"));
        };

        if territory.armies < 1 {
            return fail(format!("{id} has no armies"));
        }

        if !state.player(owner).is_some_and(|x| x.is_active()) {
            return fail(format!("{id} is held by inactive {owner}"));
        }
    }

    for player in &state.players {
        if player.eliminated && !player.cards.is_empty() {
            return fail(format!("eliminated {} still holds cards", player.id));
        }
    }

    let mut cards = HashSet::new();
    let all_cards = state
        .deck
        .iter()
        .chain(state.players.iter().flat_map(|x| &x.cards));
    for card in all_cards {
        if !cards.insert(card.id) {
            return fail(format!("{} appears twice", card.id));
        }
    }
    if cards.len() > CARD_COUNT {
        return fail(format!("{} cards in play", cards.len()));
    }

    if !state.is_over() {
        let current = state.current_player();
        if !current.and_then(|x| state.player(x)).is_some_and(|x| x.is_active()) {
            return fail("current player is not active".to_owned());
        }

        if state.turn.map(|x| x.player) != current {
            return fail("turn belongs to another player".to_owned());
        }
    }

    Ok(())
}
