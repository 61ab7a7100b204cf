use rand::Rng;

use battle_shared::{map::TerritoryId, player::PlayerId, state::GameState};

use crate::{error::Result, RulesError};

pub const MAX_ATTACK_DICE: u32 = 3;
pub const MAX_DEFEND_DICE: u32 = 2;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BattleRoll {
    pub attacker_dice: Vec<u32>,
    pub defender_dice: Vec<u32>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AttackOutcome {
    pub rolls: Vec<BattleRoll>,
    pub conquered: bool,
}

pub fn attacker_dice(armies: u32) -> u32 {
    armies.saturating_sub(1).min(MAX_ATTACK_DICE)
}

pub fn defender_dice(armies: u32) -> u32 {
    if armies == 1 {
        1
    } else {
        MAX_DEFEND_DICE.min(armies)
    }
}

pub fn validate_attack(
    state: &GameState,
    from: TerritoryId,
    to: TerritoryId,
    attacker: PlayerId,
) -> Result<()> {
    let source = &state.territories[from];
    if !source.is_owned_by(attacker) {
        return Err(RulesError::NotOwner(from));
    }

    if state.territories[to].is_owned_by(attacker) {
        return Err(RulesError::SelfAttack(to));
    }

    if !from.is_adjacent(to) {
        return Err(RulesError::NotAdjacent { from, to });
    }

    if source.armies < 2 {
        return Err(RulesError::InsufficientArmies {
            territory: from,
            armies: source.armies,
        });
    }

    Ok(())
}

/// Compares the highest dice pairwise. Ties go to the defender.
pub fn resolve(attacker_dice: Vec<u32>, defender_dice: Vec<u32>) -> BattleRoll {
    let attacker_losses = attacker_dice
        .iter()
        .zip(&defender_dice)
        .filter(|(x, y)| x <= y)
        .count() as u32;
    let defender_losses = attacker_dice
        .iter()
        .zip(&defender_dice)
        .filter(|(x, y)| x > y)
        .count() as u32;

    BattleRoll {
        attacker_dice,
        defender_dice,
        attacker_losses,
        defender_losses,
    }
}

pub fn roll<R: Rng + ?Sized>(attacking_armies: u32, defending_armies: u32, rng: &mut R) -> BattleRoll {
    let attacker = roll_sorted(attacker_dice(attacking_armies), rng);
    let defender = roll_sorted(defender_dice(defending_armies), rng);
    resolve(attacker, defender)
}

/// One roll from `from` into `to`. Returns whether `to` was conquered.
pub fn single_attack<R: Rng + ?Sized>(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    attacker: PlayerId,
    rng: &mut R,
) -> Result<(BattleRoll, bool)> {
    validate_attack(state, from, to, attacker)?;
    Ok(roll_and_apply(state, from, to, attacker, rng))
}

/// Rolls until `to` falls or `from` is down to 1 army.
pub fn auto_attack<R: Rng + ?Sized>(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    attacker: PlayerId,
    rng: &mut R,
) -> Result<AttackOutcome> {
    validate_attack(state, from, to, attacker)?;

    let mut rolls = Vec::new();
    let mut conquered = false;
    while !conquered && state.territories[from].armies >= 2 {
        let (roll, won) = roll_and_apply(state, from, to, attacker, rng);
        rolls.push(roll);
        conquered = won;
    }

    Ok(AttackOutcome { rolls, conquered })
}

/// Moves extra armies into a freshly conquered territory. Zero is a no-op.
pub fn move_armies_after_conquest(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    count: u32,
) -> Result<()> {
    let source = &state.territories[from];
    if source.occupier.is_none() || source.occupier != state.territories[to].occupier {
        return Err(RulesError::DifferentOwners { from, to });
    }

    if count >= source.armies {
        return Err(RulesError::MustLeaveArmy(from));
    }

    state.territories[from].armies -= count;
    state.territories[to].armies += count;
    Ok(())
}

fn roll_and_apply<R: Rng + ?Sized>(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    attacker: PlayerId,
    rng: &mut R,
) -> (BattleRoll, bool) {
    let roll = roll(
        state.territories[from].armies,
        state.territories[to].armies,
        rng,
    );

    let source = &mut state.territories[from];
    source.armies = source.armies.saturating_sub(roll.attacker_losses);
    let target = &mut state.territories[to];
    target.armies = target.armies.saturating_sub(roll.defender_losses);

    let conquered = target.armies == 0;
    if conquered {
        target.occupier = Some(attacker);
        target.armies = 1;
        state.territories[from].armies -= 1;
    }

    log::debug!(
        "{attacker} {from} -> {to}: {:?} vs {:?}, losses {}/{}{}",
        roll.attacker_dice,
        roll.defender_dice,
        roll.attacker_losses,
        roll.defender_losses,
        if conquered { ", conquered" } else { "" }
    );

    (roll, conquered)
}

fn roll_sorted<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<u32> {
    let mut rolls = std::iter::repeat_with(|| rng.gen_range(1..=6))
        .take(count as usize)
        .collect::<Vec<_>>();

    rolls.sort_unstable_by_key(|&x| std::cmp::Reverse(x));
    rolls
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::*;

    fn player(n: u8) -> PlayerId {
        PlayerId::new(n).unwrap()
    }

    fn state_with(armies: &[(TerritoryId, u8, u32)]) -> GameState {
        let mut state = GameState::new("g", "Alice");
        for territory in state.territories.values_mut() {
            territory.occupier = Some(player(2));
            territory.armies = 1;
        }

        for &(id, owner, count) in armies {
            state.territories[id].occupier = Some(player(owner));
            state.territories[id].armies = count;
        }

        state
    }

    #[test]
    fn dice_counts() {
        assert_eq!(attacker_dice(2), 1);
        assert_eq!(attacker_dice(3), 2);
        assert_eq!(attacker_dice(4), 3);
        assert_eq!(attacker_dice(20), 3);
        assert_eq!(defender_dice(1), 1);
        assert_eq!(defender_dice(2), 2);
        assert_eq!(defender_dice(9), 2);
    }

    #[test]
    fn ties_go_to_the_defender() {
        let roll = resolve(vec![4], vec![4]);
        assert_eq!(roll.attacker_losses, 1);
        assert_eq!(roll.defender_losses, 0);

        let roll = resolve(vec![6, 4, 1], vec![5, 4]);
        assert_eq!(roll.attacker_losses, 1);
        assert_eq!(roll.defender_losses, 1);

        let roll = resolve(vec![6, 6], vec![5]);
        assert_eq!(roll.attacker_losses, 0);
        assert_eq!(roll.defender_losses, 1);
    }

    #[test]
    fn attack_validation() {
        use TerritoryId::*;

        let state = state_with(&[(Alaska, 1, 5), (Alberta, 1, 1), (Argentina, 2, 3)]);

        assert_eq!(
            validate_attack(&state, Alaska, Argentina, player(1)),
            Err(RulesError::NotAdjacent {
                from: Alaska,
                to: Argentina
            })
        );
        assert_eq!(
            validate_attack(&state, Alaska, Alberta, player(1)),
            Err(RulesError::SelfAttack(Alberta))
        );
        assert_eq!(
            validate_attack(&state, Kamchatka, Alaska, player(1)),
            Err(RulesError::NotOwner(Kamchatka))
        );
        assert_eq!(
            validate_attack(&state, Alberta, Ontario, player(1)),
            Err(RulesError::InsufficientArmies {
                territory: Alberta,
                armies: 1
            })
        );
        assert_eq!(validate_attack(&state, Alaska, Kamchatka, player(1)), Ok(()));
    }

    #[test]
    fn auto_attack_runs_to_a_conclusion() {
        use TerritoryId::*;

        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        for _ in 0..50 {
            let mut state = state_with(&[(Alaska, 1, 8), (Kamchatka, 2, 3)]);
            let outcome = auto_attack(&mut state, Alaska, Kamchatka, player(1), &mut rng).unwrap();

            assert!(!outcome.rolls.is_empty());
            if outcome.conquered {
                assert!(state.territories[Kamchatka].is_owned_by(player(1)));
                assert_eq!(state.territories[Kamchatka].armies, 1);
                assert!(state.territories[Alaska].armies >= 1);
            } else {
                assert_eq!(state.territories[Alaska].armies, 1);
                assert!(state.territories[Kamchatka].is_owned_by(player(2)));
            }
        }
    }

    #[test]
    fn moving_after_conquest() {
        use TerritoryId::*;

        let mut state = state_with(&[(Alaska, 1, 5), (Kamchatka, 1, 1)]);

        move_armies_after_conquest(&mut state, Alaska, Kamchatka, 0).unwrap();
        assert_eq!(state.territories[Alaska].armies, 5);
        assert_eq!(state.territories[Kamchatka].armies, 1);

        assert_eq!(
            move_armies_after_conquest(&mut state, Alaska, Kamchatka, 5),
            Err(RulesError::MustLeaveArmy(Alaska))
        );

        move_armies_after_conquest(&mut state, Alaska, Kamchatka, 4).unwrap();
        assert_eq!(state.territories[Alaska].armies, 1);
        assert_eq!(state.territories[Kamchatka].armies, 5);

        assert_eq!(
            move_armies_after_conquest(&mut state, Alaska, Alberta, 0),
            Err(RulesError::DifferentOwners {
                from: Alaska,
                to: Alberta
            })
        );
    }

    proptest! {
        #[test]
        fn every_roll_costs_someone(seed in any::<u64>(), attacking in 2u32..30, defending in 1u32..30) {
            use TerritoryId::*;

            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut state = state_with(&[(Alaska, 1, attacking), (Kamchatka, 2, defending)]);
            let (roll, conquered) =
                single_attack(&mut state, Alaska, Kamchatka, player(1), &mut rng).unwrap();

            prop_assert!(roll.attacker_losses + roll.defender_losses >= 1);
            prop_assert!(roll.attacker_dice.windows(2).all(|x| x[0] >= x[1]));
            prop_assert!(roll.attacker_dice.iter().chain(&roll.defender_dice).all(|x| (1..=6).contains(x)));
            prop_assert_eq!(roll.attacker_dice.len() as u32, attacking.saturating_sub(1).min(3));
            prop_assert_eq!(roll.defender_dice.len() as u32, defending.min(2));

            let alaska = state.territories[Alaska].armies;
            let kamchatka = state.territories[Kamchatka].armies;
            prop_assert!(alaska >= 1);
            prop_assert!(kamchatka >= 1);

            if conquered {
                prop_assert!(state.territories[Kamchatka].is_owned_by(player(1)));
                prop_assert_eq!(alaska, attacking - roll.attacker_losses - 1);
            } else {
                prop_assert_eq!(alaska, attacking - roll.attacker_losses);
                prop_assert_eq!(kamchatka, defending - roll.defender_losses);
            }
        }
    }
}
