use std::collections::VecDeque;

use enum_map::EnumMap;
use rand::Rng;

use battle_shared::{
    map::TerritoryId,
    player::PlayerId,
    state::{GameState, Phase, TurnState},
    CardId,
};

use crate::{
    battle::{self, BattleRoll},
    deck,
    error::Result,
    reinforcement::{self, ReinforcementInfo},
    trade_in::{self, TradeIn},
    RulesError,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub territory: TerritoryId,
    pub armies: u32,
}

impl Placement {
    pub fn new(territory: TerritoryId, armies: u32) -> Self {
        Self { territory, armies }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AttackReport {
    pub rolls: Vec<BattleRoll>,
    pub conquered: bool,
    pub eliminated: Vec<PlayerId>,
    pub winner: Option<PlayerId>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    TradeCards(Vec<CardId>),
    PlaceReinforcements(Vec<Placement>),
    EndReinforcement,
    Attack { from: TerritoryId, to: TerritoryId },
    AutoAttack { from: TerritoryId, to: TerritoryId },
    MoveArmies { from: TerritoryId, to: TerritoryId, count: u32 },
    EndAttack,
    Fortify { from: TerritoryId, to: TerritoryId, count: u32 },
    EndTurn,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ActionOutcome {
    Traded(TradeIn),
    Placed { remaining: u32 },
    Attacked(AttackReport),
    Moved,
    PhaseChanged(Phase),
    TurnEnded { next: PlayerId, reinforcements: u32 },
}

pub fn apply<R: Rng + ?Sized>(
    state: &mut GameState,
    actor: PlayerId,
    action: Action,
    rng: &mut R,
) -> Result<ActionOutcome> {
    match action {
        Action::TradeCards(cards) => trade_cards(state, actor, &cards).map(ActionOutcome::Traded),
        Action::PlaceReinforcements(placements) => {
            place_reinforcements(state, actor, &placements)
                .map(|remaining| ActionOutcome::Placed { remaining })
        }
        Action::EndReinforcement => {
            end_reinforcement_phase(state, actor).map(|()| ActionOutcome::PhaseChanged(state.phase))
        }
        Action::Attack { from, to } => {
            attack(state, actor, from, to, rng).map(ActionOutcome::Attacked)
        }
        Action::AutoAttack { from, to } => {
            auto_attack(state, actor, from, to, rng).map(ActionOutcome::Attacked)
        }
        Action::MoveArmies { from, to, count } => {
            move_armies(state, actor, from, to, count).map(|()| ActionOutcome::Moved)
        }
        Action::EndAttack => {
            end_attack_phase(state, actor).map(|()| ActionOutcome::PhaseChanged(state.phase))
        }
        Action::Fortify { from, to, count } => {
            fortify(state, actor, from, to, count).map(|()| ActionOutcome::Moved)
        }
        Action::EndTurn => end_turn(state, actor).map(|turn| ActionOutcome::TurnEnded {
            next: turn.player,
            reinforcements: turn.reinforcements_remaining,
        }),
    }
}

pub fn trade_cards(state: &mut GameState, actor: PlayerId, cards: &[CardId]) -> Result<TradeIn> {
    check_turn(state, actor, Phase::Reinforce)?;

    let player = state
        .player_mut(actor)
        .ok_or(RulesError::PlayerNotFound(actor))?;
    let trade = trade_in::trade_in(player, cards)?;

    if let Some(turn) = &mut state.turn {
        turn.reinforcements_remaining += trade.armies_awarded;
    }

    state.touch();
    Ok(trade)
}

/// Places a batch of reinforcements. Returns how many are left.
pub fn place_reinforcements(
    state: &mut GameState,
    actor: PlayerId,
    placements: &[Placement],
) -> Result<u32> {
    let turn = check_turn(state, actor, Phase::Reinforce)?;

    if placements.is_empty() {
        return Err(RulesError::NoPlacements);
    }

    let total = placements
        .iter()
        .try_fold(0u32, |acc, x| acc.checked_add(x.armies));
    let requested = match total {
        Some(x) if x <= turn.reinforcements_remaining => x,
        _ => {
            return Err(RulesError::NotEnoughReinforcements {
                requested: total.unwrap_or(u32::MAX),
                remaining: turn.reinforcements_remaining,
            })
        }
    };

    for placement in placements {
        if placement.armies < 1 {
            return Err(RulesError::EmptyPlacement(placement.territory));
        }

        if !state.territories[placement.territory].is_owned_by(actor) {
            return Err(RulesError::NotOwner(placement.territory));
        }
    }

    for placement in placements {
        state.territories[placement.territory].armies += placement.armies;
    }

    let remaining = turn.reinforcements_remaining - requested;
    if let Some(turn) = &mut state.turn {
        turn.reinforcements_remaining = remaining;
    }

    log::debug!("{actor} placed {requested} armies, {remaining} remaining");

    state.touch();
    Ok(remaining)
}

/// Reinforcement details for the player whose turn it is.
pub fn reinforcement_info(state: &GameState, actor: PlayerId) -> Result<ReinforcementInfo> {
    check_actor(state, actor)?;
    reinforcement::info(state)
}

pub fn end_reinforcement_phase(state: &mut GameState, actor: PlayerId) -> Result<()> {
    let turn = check_turn(state, actor, Phase::Reinforce)?;

    if turn.reinforcements_remaining > 0 {
        return Err(RulesError::ReinforcementsRemaining(
            turn.reinforcements_remaining,
        ));
    }

    let hand = &state
        .player(actor)
        .ok_or(RulesError::PlayerNotFound(actor))?
        .cards;
    if trade_in::must_trade_in(hand) {
        return Err(RulesError::MustTradeCards);
    }

    set_phase(state, Phase::Attack);
    Ok(())
}

pub fn attack<R: Rng + ?Sized>(
    state: &mut GameState,
    actor: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    rng: &mut R,
) -> Result<AttackReport> {
    check_turn(state, actor, Phase::Attack)?;

    let (roll, conquered) = battle::single_attack(state, from, to, actor, rng)?;
    Ok(after_attack(state, actor, vec![roll], conquered))
}

pub fn auto_attack<R: Rng + ?Sized>(
    state: &mut GameState,
    actor: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    rng: &mut R,
) -> Result<AttackReport> {
    check_turn(state, actor, Phase::Attack)?;

    let outcome = battle::auto_attack(state, from, to, actor, rng)?;
    Ok(after_attack(state, actor, outcome.rolls, outcome.conquered))
}

pub fn move_armies(
    state: &mut GameState,
    actor: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    count: u32,
) -> Result<()> {
    check_turn(state, actor, Phase::Attack)?;

    if !state.territories[from].is_owned_by(actor) {
        return Err(RulesError::NotOwner(from));
    }

    battle::move_armies_after_conquest(state, from, to, count)?;
    state.touch();
    Ok(())
}

pub fn end_attack_phase(state: &mut GameState, actor: PlayerId) -> Result<()> {
    check_turn(state, actor, Phase::Attack)?;

    award_card(state, actor);
    set_phase(state, Phase::Fortify);
    Ok(())
}

pub fn fortify(
    state: &mut GameState,
    actor: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    count: u32,
) -> Result<()> {
    check_turn(state, actor, Phase::Fortify)?;

    if count < 1 {
        return Err(RulesError::NothingToMove);
    }

    for territory in [from, to] {
        if !state.territories[territory].is_owned_by(actor) {
            return Err(RulesError::NotOwner(territory));
        }
    }

    if state.territories[from].armies <= count {
        return Err(RulesError::MustLeaveArmy(from));
    }

    if !is_connected(state, actor, from, to) {
        return Err(RulesError::NotConnected { from, to });
    }

    state.territories[from].armies -= count;
    state.territories[to].armies += count;

    log::debug!("{actor} fortified {to} with {count} armies from {from}");

    state.touch();
    Ok(())
}

/// Hands the turn to the next surviving player.
pub fn end_turn(state: &mut GameState, actor: PlayerId) -> Result<TurnState> {
    check_actor(state, actor)?;

    match state.phase {
        Phase::Attack => award_card(state, actor),
        Phase::Fortify => {}
        phase => return Err(RulesError::CannotEndTurn(phase)),
    }

    let count = state.turn_order.len();
    let mut index = (state.current_player_index + 1) % count;
    for _ in 0..state.players.len() {
        let next = state.turn_order[index];
        if state.player(next).is_some_and(|x| x.is_active()) {
            break;
        }

        index = (index + 1) % count;
    }

    let next = state.turn_order[index];
    let turn = TurnState::new(next, reinforcement::reinforcements(state, next));
    state.current_player_index = index;
    state.turn = Some(turn);
    set_phase(state, Phase::Reinforce);

    log::info!(
        "turn passes from {actor} to {next} with {} reinforcements",
        turn.reinforcements_remaining
    );

    Ok(turn)
}

/// True if `from` reaches `to` through territories owned by `player`.
pub fn is_connected(
    state: &GameState,
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
) -> bool {
    let mut visited = EnumMap::<TerritoryId, bool>::default();
    let mut queue = VecDeque::from([from]);
    visited[from] = true;

    while let Some(current) = queue.pop_front() {
        if current == to {
            return true;
        }

        for &next in current.neighbours() {
            if !visited[next] && state.territories[next].is_owned_by(player) {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    false
}

fn check_actor(state: &GameState, actor: PlayerId) -> Result<TurnState> {
    if state.is_over() {
        return Err(RulesError::GameOver);
    }

    let turn = state.turn.ok_or(RulesError::NoActiveTurn)?;
    let current = state.current_player().ok_or(RulesError::NoActiveTurn)?;
    if actor != current {
        return Err(RulesError::NotYourTurn { actor, current });
    }

    Ok(turn)
}

fn check_turn(state: &GameState, actor: PlayerId, expected: Phase) -> Result<TurnState> {
    let turn = check_actor(state, actor)?;
    if state.phase != expected {
        return Err(RulesError::InvalidPhase {
            expected,
            actual: state.phase,
        });
    }

    Ok(turn)
}

fn set_phase(state: &mut GameState, phase: Phase) {
    log::debug!("game {} enters {phase}", state.id);
    state.phase = phase;
    state.touch();
}

fn after_attack(
    state: &mut GameState,
    attacker: PlayerId,
    rolls: Vec<BattleRoll>,
    conquered: bool,
) -> AttackReport {
    if conquered {
        if let Some(turn) = &mut state.turn {
            turn.conquered_territory = true;
        }
    }

    let eliminated = eliminate_defeated(state, attacker);

    let winner = {
        let mut active = state.active_players().map(|x| x.id);
        match (active.next(), active.next()) {
            (Some(winner), None) => Some(winner),
            _ => None,
        }
    };

    if let Some(winner) = winner {
        state.winner = Some(winner);
        state.phase = Phase::GameOver;
        log::info!("game {} won by {winner}", state.id);
    }

    state.touch();
    AttackReport {
        rolls,
        conquered,
        eliminated,
        winner,
    }
}

/// Marks every surviving player without territory as eliminated and hands
/// their cards to `attacker`.
fn eliminate_defeated(state: &mut GameState, attacker: PlayerId) -> Vec<PlayerId> {
    let defeated = state
        .active_players()
        .map(|x| x.id)
        .filter(|&x| state.territory_count(x) == 0)
        .collect::<Vec<_>>();

    for &id in &defeated {
        let mut surrendered = Vec::new();
        if let Some(player) = state.player_mut(id) {
            player.eliminated = true;
            surrendered = std::mem::take(&mut player.cards);
        }

        log::info!(
            "{id} eliminated by {attacker}, surrendering {} cards",
            surrendered.len()
        );

        if let Some(player) = state.player_mut(attacker) {
            player.cards.extend(surrendered);
        }
    }

    defeated
}

/// One card for a turn with a conquest. The flag is cleared so the card is
/// drawn at most once.
fn award_card(state: &mut GameState, player: PlayerId) {
    let Some(turn) = &mut state.turn else {
        return;
    };

    if !turn.conquered_territory {
        return;
    }

    turn.conquered_territory = false;
    let Some(card) = deck::draw(&mut state.deck) else {
        return;
    };

    if let Some(player) = state.player_mut(player) {
        log::debug!("{} draws {}", player.id, card.id);
        player.cards.push(card);
    }
}
