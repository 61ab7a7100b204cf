pub mod map;
pub mod player;
pub mod state;

use std::{fmt, str::FromStr};

use map::TerritoryId;
use player::PlayerId;

pub const CARD_COUNT: usize = map::TERRITORY_COUNT;

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ParseIdError {
    #[error("territory {0} not found")]
    Territory(String),
    #[error("continent {0} not found")]
    Continent(String),
    #[error("malformed player id {0}")]
    Player(String),
    #[error("malformed card id {0}")]
    Card(String),
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, enum_map::Enum)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum CardType {
    Infantry,
    Cavalry,
    Artillery,
}

impl CardType {
    pub const ALL: [Self; 3] = [Self::Infantry, Self::Cavalry, Self::Artillery];
}

/// Cards are numbered from 1 and render as `card-N`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct CardId(u8);

impl CardId {
    pub fn new(v: u8) -> Option<Self> {
        (1..=CARD_COUNT as u8).contains(&v).then_some(Self(v))
    }

    /// The card printed for `territory`; numbering follows map order.
    pub fn for_territory(territory: TerritoryId) -> Self {
        Self(territory.index() as u8 + 1)
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("card-")
            .and_then(|x| x.parse().ok())
            .and_then(Self::new)
            .ok_or_else(|| ParseIdError::Card(s.to_owned()))
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for CardId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: CardType,
    pub territory: Option<TerritoryId>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Territory {
    pub id: TerritoryId,
    pub occupier: Option<PlayerId>,
    pub armies: u32,
}

impl Territory {
    pub fn new(id: TerritoryId) -> Self {
        Self {
            id,
            occupier: None,
            armies: 0,
        }
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.occupier == Some(player)
    }
}
