use enum_map::EnumMap;

use battle_shared::{player::Player, Card, CardId, CardType};

use crate::{deck, error::Result, RulesError};

pub const MIN_TRADE: usize = 3;
pub const MANDATORY_TRADE: usize = 5;
pub const MAX_TRADE: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TradeIn {
    pub armies_awarded: u32,
    pub traded: Vec<Card>,
    pub remaining: Vec<Card>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HandBreakdown {
    pub total: usize,
    pub by_type: EnumMap<CardType, usize>,
}

pub fn can_trade_in(hand: &[Card]) -> bool {
    hand.len() >= MIN_TRADE
}

pub fn must_trade_in(hand: &[Card]) -> bool {
    hand.len() >= MANDATORY_TRADE
}

/// 3 cards pay 8, each extra card 2 more. The payout does not escalate with
/// previous trades.
pub fn armies_for_card_count(count: usize) -> u32 {
    if count < MIN_TRADE {
        0
    } else {
        2 + 2 * count as u32
    }
}

/// All one type, or at least one of every type.
pub fn is_valid_set(cards: &[Card]) -> bool {
    if cards.len() < MIN_TRADE {
        return false;
    }

    let counts = deck::type_counts(cards);
    counts.values().any(|&x| x == cards.len()) || counts.values().all(|&x| x > 0)
}

/// Removes `card_ids` from the player's hand and returns the award.
///
/// Nothing is removed unless the whole set is valid.
pub fn trade_in(player: &mut Player, card_ids: &[CardId]) -> Result<TradeIn> {
    if card_ids.len() < MIN_TRADE {
        return Err(RulesError::InsufficientCards(card_ids.len()));
    }

    let mut taken = vec![false; player.cards.len()];
    for &id in card_ids {
        let index = player
            .cards
            .iter()
            .enumerate()
            .position(|(i, x)| x.id == id && !taken[i])
            .ok_or(RulesError::CardNotFound(id))?;
        taken[index] = true;
    }

    let mut traded = Vec::with_capacity(card_ids.len());
    let mut remaining = Vec::with_capacity(player.cards.len());
    for (&card, is_taken) in player.cards.iter().zip(taken) {
        if is_taken {
            traded.push(card);
        } else {
            remaining.push(card);
        }
    }

    if !is_valid_set(&traded) {
        return Err(RulesError::InvalidCardSet);
    }

    let armies_awarded = armies_for_card_count(traded.len());
    player.cards.clone_from(&remaining);

    log::debug!(
        "{} traded {} cards for {armies_awarded} armies",
        player.id,
        traded.len()
    );

    Ok(TradeIn {
        armies_awarded,
        traded,
        remaining,
    })
}

/// Every valid combination of 3 to 5 cards, smallest sets first.
pub fn possible_trade_sets(hand: &[Card]) -> Vec<Vec<CardId>> {
    let mut sets = Vec::new();
    for size in MIN_TRADE..=MAX_TRADE.min(hand.len()) {
        for_each_combination(hand.len(), size, |indices| {
            let cards = indices.iter().map(|&i| hand[i]).collect::<Vec<_>>();
            if is_valid_set(&cards) {
                sets.push(cards.iter().map(|x| x.id).collect());
            }
        });
    }

    sets
}

pub fn recommended_trade_set(hand: &[Card]) -> Option<Vec<CardId>> {
    possible_trade_sets(hand).into_iter().next()
}

pub fn hand_breakdown(hand: &[Card]) -> HandBreakdown {
    HandBreakdown {
        total: hand.len(),
        by_type: deck::type_counts(hand),
    }
}

fn for_each_combination(n: usize, k: usize, mut f: impl FnMut(&[usize])) {
    if k > n {
        return;
    }

    let mut indices = (0..k).collect::<Vec<_>>();
    loop {
        f(&indices);

        // Rightmost index that can still advance.
        let Some(i) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
            return;
        };

        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
