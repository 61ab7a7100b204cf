use std::{fmt, time::SystemTime};

use enum_map::EnumMap;

use crate::{
    map::TerritoryId,
    player::{ArmyColor, Player, PlayerId},
    Card, Territory,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Phase {
    Setup,
    Reinforce,
    Attack,
    Fortify,
    GameOver,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "SETUP",
            Phase::Reinforce => "REINFORCE",
            Phase::Attack => "ATTACK",
            Phase::Fortify => "FORTIFY",
            Phase::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub player: PlayerId,
    pub reinforcements_remaining: u32,
    pub conquered_territory: bool,
}

impl TurnState {
    pub fn new(player: PlayerId, reinforcements: u32) -> Self {
        Self {
            player,
            reinforcements_remaining: reinforcements,
            conquered_territory: false,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub id: String,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub turn_order: Vec<PlayerId>,
    pub current_player_index: usize,
    pub territories: EnumMap<TerritoryId, Territory>,
    pub deck: Vec<Card>,
    pub turn: Option<TurnState>,
    pub winner: Option<PlayerId>,
    pub created_at: SystemTime,
    pub last_modified: SystemTime,
}

impl GameState {
    /// An unstarted lobby game with its creator as the only player.
    pub fn new(id: impl Into<String>, creator: impl Into<String>) -> Self {
        let creator = Player::new(PlayerId::from_join_index(0), creator, ArmyColor::Red);
        let now = SystemTime::now();

        Self {
            id: id.into(),
            phase: Phase::Setup,
            turn_order: vec![creator.id],
            players: vec![creator],
            current_player_index: 0,
            territories: EnumMap::from_fn(Territory::new),
            deck: Vec::new(),
            turn: None,
            winner: None,
            created_at: now,
            last_modified: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_modified = SystemTime::now();
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|x| x.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|x| x.id == id)
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn_order.get(self.current_player_index).copied()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|x| x.is_active())
    }

    pub fn territories_owned_by(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.territories
            .iter()
            .filter(|(_, x)| x.is_owned_by(player))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn territory_count(&self, player: PlayerId) -> usize {
        self.territories
            .values()
            .filter(|x| x.is_owned_by(player))
            .count()
    }

    pub fn army_count(&self, player: PlayerId) -> u32 {
        self.territories
            .values()
            .filter(|x| x.is_owned_by(player))
            .map(|x| x.armies)
            .sum()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
