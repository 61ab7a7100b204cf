use std::{fmt, str::FromStr};

use crate::{Card, ParseIdError};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Players are numbered by join order starting at 1 and render as `player-N`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct PlayerId(u8);

impl PlayerId {
    pub fn new(number: u8) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    /// Id of the player who joined at `index` (0-based).
    pub fn from_join_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn join_index(self) -> usize {
        self.0 as usize - 1
    }

    /// Returns `true` if this is the player who opened the lobby.
    #[must_use]
    pub fn is_creator(self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("player-")
            .and_then(|x| x.parse().ok())
            .and_then(Self::new)
            .ok_or_else(|| ParseIdError::Player(s.to_owned()))
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, enum_map::Enum, enumn::N)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[repr(u8)]
pub enum ArmyColor {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    Purple,
}

impl ArmyColor {
    pub const ALL: [Self; MAX_PLAYERS] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Black,
        Self::Purple,
    ];

    /// Colors follow join order, not turn order.
    pub fn for_join_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::n)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: ArmyColor,
    #[cfg_attr(feature = "serde", serde(rename = "is_eliminated"))]
    pub eliminated: bool,
    pub cards: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, color: ArmyColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            eliminated: false,
            cards: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_ids_follow_join_order() {
        let id = PlayerId::from_join_index(2);
        assert_eq!(id.to_string(), "player-3");
        assert_eq!(id.join_index(), 2);
        assert_eq!("player-3".parse::<PlayerId>(), Ok(id));
        assert!("player-0".parse::<PlayerId>().is_err());
        assert!("p3".parse::<PlayerId>().is_err());
        assert!(PlayerId::from_join_index(0).is_creator());
    }

    #[test]
    fn colors_are_assigned_by_join_index() {
        assert_eq!(ArmyColor::for_join_index(0), Some(ArmyColor::Red));
        assert_eq!(ArmyColor::for_join_index(5), Some(ArmyColor::Purple));
        assert_eq!(ArmyColor::for_join_index(6), None);
        assert_eq!(ArmyColor::for_join_index(256), None);
        for (i, color) in ArmyColor::ALL.into_iter().enumerate() {
            assert_eq!(ArmyColor::for_join_index(i), Some(color));
        }
    }
}
