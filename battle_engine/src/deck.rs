use enum_map::EnumMap;
use rand::{seq::SliceRandom, Rng};

use battle_shared::{map::TerritoryId, Card, CardId, CardType};

/// One card per territory, types cycling infantry, cavalry, artillery in map
/// order, shuffled.
pub fn create_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = TerritoryId::all()
        .map(|territory| Card {
            id: CardId::for_territory(territory),
            kind: CardType::ALL[territory.index() % CardType::ALL.len()],
            territory: Some(territory),
        })
        .collect::<Vec<_>>();

    deck.shuffle(rng);
    deck
}

/// Takes the top card. An empty deck yields nothing.
pub fn draw(deck: &mut Vec<Card>) -> Option<Card> {
    if deck.is_empty() {
        None
    } else {
        Some(deck.remove(0))
    }
}

/// Takes up to `count` cards from the top.
pub fn draw_many(deck: &mut Vec<Card>, count: usize) -> Vec<Card> {
    let count = count.min(deck.len());
    deck.drain(..count).collect()
}

/// Puts cards back and reshuffles the whole deck.
///
/// Not used on elimination: surrendered cards go to the eliminating player.
pub fn return_and_reshuffle<R: Rng + ?Sized>(deck: &mut Vec<Card>, cards: Vec<Card>, rng: &mut R) {
    deck.extend(cards);
    deck.shuffle(rng);
}

pub fn type_counts(cards: &[Card]) -> EnumMap<CardType, usize> {
    let mut counts = EnumMap::default();
    for card in cards {
        counts[card.kind] += 1;
    }

    counts
}
