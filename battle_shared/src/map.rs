use std::{fmt, str::FromStr};

use enum_map::{Enum, EnumMap};

use crate::ParseIdError;

pub const TERRITORY_COUNT: usize = <TerritoryId as Enum>::LENGTH;

/// Territories in map listing order. Card types are derived from this order,
/// so variants must not be reordered.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, enum_map::Enum, enumn::N)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TerritoryId {
    Greenland,
    Quebec,
    EasternUs,
    WesternUs,
    Alberta,
    Ontario,
    NorthwestTerritory,
    Alaska,
    CentralAmerica,
    Venezuela,
    Peru,
    Brazil,
    Argentina,
    Madagascar,
    SouthAfrica,
    Congo,
    EastAfrica,
    NorthAfrica,
    Egypt,
    Indonesia,
    NewGuinea,
    EastAustralia,
    WestAustralia,
    WesternEurope,
    SouthernEurope,
    NorthernEurope,
    Ukraine,
    Scandinavia,
    Iceland,
    GreatBritain,
    Afghanistan,
    MiddleEast,
    India,
    Thailand,
    China,
    Mongolia,
    Japan,
    Ural,
    Kamchatka,
    Yakutsk,
    Irkutsk,
    Siberia,
}

impl TerritoryId {
    pub fn all() -> impl Iterator<Item = Self> {
        (0..TERRITORY_COUNT).map(<Self as Enum>::from_usize)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn id(self) -> &'static str {
        TERRITORY_IDS[self as usize]
    }

    pub const fn name(self) -> &'static str {
        TERRITORY_NAMES[self as usize]
    }

    pub fn continent(self) -> Continent {
        CONTINENTS[self]
    }

    pub fn neighbours(self) -> &'static [TerritoryId] {
        EDGES[self]
    }

    pub fn is_adjacent(self, other: TerritoryId) -> bool {
        EDGES[self].contains(&other)
    }

    pub fn parse(id: &str) -> Option<Self> {
        TERRITORY_IDS
            .iter()
            .position(|&x| x == id)
            .and_then(|x| Self::n(x as u8))
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TerritoryId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseIdError::Territory(s.to_owned()))
    }
}

/// Adjacency by string id. Unknown ids are never adjacent to anything.
pub fn are_adjacent(a: &str, b: &str) -> bool {
    match (TerritoryId::parse(a), TerritoryId::parse(b)) {
        (Some(a), Some(b)) => a.is_adjacent(b),
        _ => false,
    }
}

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, enum_map::Enum, enumn::N)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Continent {
    NorthAmerica,
    SouthAmerica,
    Africa,
    Australia,
    Europe,
    Asia,
}

impl Continent {
    pub const ALL: [Self; 6] = [
        Self::NorthAmerica,
        Self::SouthAmerica,
        Self::Africa,
        Self::Australia,
        Self::Europe,
        Self::Asia,
    ];

    pub const fn id(self) -> &'static str {
        ["north-america", "south-america", "africa", "australia", "europe", "asia"][self as usize]
    }

    pub const fn name(self) -> &'static str {
        ["North America", "South America", "Africa", "Australia", "Europe", "Asia"][self as usize]
    }

    pub const fn territory_count(self) -> usize {
        [9, 4, 6, 4, 7, 12][self as usize]
    }

    pub const fn bonus(self) -> u32 {
        [5, 2, 3, 2, 5, 7][self as usize]
    }

    pub fn iter_territories(self) -> impl Iterator<Item = TerritoryId> {
        TerritoryId::all().filter(move |x| x.continent() == self)
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.id() == id)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Continent {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseIdError::Continent(s.to_owned()))
    }
}

const TERRITORY_IDS: [&str; TERRITORY_COUNT] = [
    "greenland",
    "quebec",
    "eastern-us",
    "western-us",
    "alberta",
    "ontario",
    "northwest-territory",
    "alaska",
    "central-america",
    "venezuela",
    "peru",
    "brazil",
    "argentina",
    "madagascar",
    "south-africa",
    "congo",
    "east-africa",
    "north-africa",
    "egypt",
    "indonesia",
    "new-guinea",
    "east-australia",
    "west-australia",
    "western-europe",
    "southern-europe",
    "northern-europe",
    "ukraine",
    "scandinavia",
    "iceland",
    "great-britain",
    "afghanistan",
    "middle-east",
    "india",
    "thailand",
    "china",
    "mongolia",
    "japan",
    "ural",
    "kamchatka",
    "yakutsk",
    "irkutsk",
    "siberia",
];

const TERRITORY_NAMES: [&str; TERRITORY_COUNT] = [
    "Greenland",
    "Quebec",
    "Eastern US",
    "Western US",
    "Alberta",
    "Ontario",
    "NW Territory",
    "Alaska",
    "Central America",
    "Venezuela",
    "Peru",
    "Brazil",
    "Argentina",
    "Madagascar",
    "South Africa",
    "Congo",
    "East Africa",
    "North Africa",
    "Egypt",
    "Indonesia",
    "New Guinea",
    "East Australia",
    "West Australia",
    "Western Europe",
    "Southern Europe",
    "Northern Europe",
    "Ukraine",
    "Scandinavia",
    "Iceland",
    "Great Britain",
    "Afghanistan",
    "Middle East",
    "India",
    "Thailand",
    "China",
    "Mongolia",
    "Japan",
    "Ural",
    "Kamchatka",
    "Yakutsk",
    "Irkutsk",
    "Siberia",
];

macro_rules! edge_arrays {
    ($($origin:expr => [$($dest:expr),* $(,)?],)*) => {
        const {
            let mut array: [&[$crate::map::TerritoryId]; TERRITORY_COUNT] = [&[]; TERRITORY_COUNT];
            $(
                array[$origin as ::core::primitive::usize] = &[$($dest,)*];
            )*

            array
        }
    };
}

pub const EDGES: EnumMap<TerritoryId, &[TerritoryId]> = {
    use TerritoryId::*;

    EnumMap::from_array(edge_arrays! {
        Greenland => [Iceland, Quebec, NorthwestTerritory],
        Quebec => [Greenland, EasternUs, Ontario],
        EasternUs => [Quebec, CentralAmerica, WesternUs, Ontario],
        WesternUs => [EasternUs, CentralAmerica, Ontario, Alberta],
        Alberta => [Alaska, NorthwestTerritory, Ontario, WesternUs],
        Ontario => [Quebec, EasternUs, WesternUs, Alberta, NorthwestTerritory],
        NorthwestTerritory => [Alaska, Alberta, Ontario, Greenland],
        Alaska => [Kamchatka, NorthwestTerritory, Alberta],
        CentralAmerica => [WesternUs, EasternUs, Venezuela],
        Venezuela => [CentralAmerica, Peru, Brazil],
        Peru => [Venezuela, Brazil, Argentina],
        Brazil => [Venezuela, Peru, Argentina, NorthAfrica],
        Argentina => [Brazil, Peru],
        Madagascar => [EastAfrica, SouthAfrica],
        SouthAfrica => [Congo, EastAfrica, Madagascar],
        Congo => [SouthAfrica, EastAfrica, NorthAfrica],
        EastAfrica => [Egypt, MiddleEast, NorthAfrica, Congo, SouthAfrica, Madagascar],
        NorthAfrica => [Brazil, WesternEurope, SouthernEurope, Egypt, EastAfrica, Congo],
        Egypt => [EastAfrica, NorthAfrica, SouthernEurope, MiddleEast],
        Indonesia => [NewGuinea, WestAustralia, Thailand],
        NewGuinea => [Indonesia, WestAustralia, EastAustralia],
        EastAustralia => [WestAustralia, NewGuinea],
        WestAustralia => [EastAustralia, NewGuinea, Indonesia],
        WesternEurope => [GreatBritain, NorthernEurope, SouthernEurope, NorthAfrica],
        SouthernEurope => [Egypt, MiddleEast, Ukraine, NorthernEurope, WesternEurope, NorthAfrica],
        NorthernEurope => [Scandinavia, SouthernEurope, Ukraine, GreatBritain, WesternEurope],
        Ukraine => [Scandinavia, NorthernEurope, SouthernEurope, MiddleEast, Afghanistan, Ural],
        Scandinavia => [Ukraine, NorthernEurope, Iceland, GreatBritain],
        Iceland => [Greenland, GreatBritain, Scandinavia],
        GreatBritain => [Iceland, Scandinavia, WesternEurope, NorthernEurope],
        Afghanistan => [Ural, Ukraine, MiddleEast, India, China],
        MiddleEast => [Egypt, EastAfrica, SouthernEurope, Ukraine, Afghanistan, India],
        India => [Thailand, China, Afghanistan, MiddleEast],
        Thailand => [Indonesia, China, India],
        China => [Thailand, India, Afghanistan, Ural, Siberia, Mongolia],
        Mongolia => [Japan, China, Irkutsk, Kamchatka, Siberia],
        Japan => [Kamchatka, Mongolia],
        Ural => [Ukraine, Afghanistan, Siberia, China],
        Kamchatka => [Alaska, Yakutsk, Irkutsk, Mongolia, Japan],
        Yakutsk => [Kamchatka, Irkutsk, Siberia],
        Irkutsk => [Yakutsk, Mongolia, Kamchatka, Siberia],
        Siberia => [Ural, China, Mongolia, Irkutsk, Yakutsk],
    })
};

macro_rules! const_enum_map {
    ($($territory:expr => $continent:expr,)*) => {
        const {
            let mut i = 0;
            $(
                if i != $territory as ::core::primitive::usize {
                    ::core::panic!("Enum entries must be in order");
                }
                i += 1;
            )*

            let _ = i;
            ::enum_map::EnumMap::from_array([
                $($continent,)*
            ])
        }
    };
}

const CONTINENTS: EnumMap<TerritoryId, Continent> = const_enum_map! {
    TerritoryId::Greenland => Continent::NorthAmerica,
    TerritoryId::Quebec => Continent::NorthAmerica,
    TerritoryId::EasternUs => Continent::NorthAmerica,
    TerritoryId::WesternUs => Continent::NorthAmerica,
    TerritoryId::Alberta => Continent::NorthAmerica,
    TerritoryId::Ontario => Continent::NorthAmerica,
    TerritoryId::NorthwestTerritory => Continent::NorthAmerica,
    TerritoryId::Alaska => Continent::NorthAmerica,
    TerritoryId::CentralAmerica => Continent::NorthAmerica,
    TerritoryId::Venezuela => Continent::SouthAmerica,
    TerritoryId::Peru => Continent::SouthAmerica,
    TerritoryId::Brazil => Continent::SouthAmerica,
    TerritoryId::Argentina => Continent::SouthAmerica,
    TerritoryId::Madagascar => Continent::Africa,
    TerritoryId::SouthAfrica => Continent::Africa,
    TerritoryId::Congo => Continent::Africa,
    TerritoryId::EastAfrica => Continent::Africa,
    TerritoryId::NorthAfrica => Continent::Africa,
    TerritoryId::Egypt => Continent::Africa,
    TerritoryId::Indonesia => Continent::Australia,
    TerritoryId::NewGuinea => Continent::Australia,
    TerritoryId::EastAustralia => Continent::Australia,
    TerritoryId::WestAustralia => Continent::Australia,
    TerritoryId::WesternEurope => Continent::Europe,
    TerritoryId::SouthernEurope => Continent::Europe,
    TerritoryId::NorthernEurope => Continent::Europe,
    TerritoryId::Ukraine => Continent::Europe,
    TerritoryId::Scandinavia => Continent::Europe,
    TerritoryId::Iceland => Continent::Europe,
    TerritoryId::GreatBritain => Continent::Europe,
    TerritoryId::Afghanistan => Continent::Asia,
    TerritoryId::MiddleEast => Continent::Asia,
    TerritoryId::India => Continent::Asia,
    TerritoryId::Thailand => Continent::Asia,
    TerritoryId::China => Continent::Asia,
    TerritoryId::Mongolia => Continent::Asia,
    TerritoryId::Japan => Continent::Asia,
    TerritoryId::Ural => Continent::Asia,
    TerritoryId::Kamchatka => Continent::Asia,
    TerritoryId::Yakutsk => Continent::Asia,
    TerritoryId::Irkutsk => Continent::Asia,
    TerritoryId::Siberia => Continent::Asia,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_has_42_territories_and_6_continents() {
        assert_eq!(TerritoryId::all().count(), 42);
        assert_eq!(Continent::ALL.len(), 6);
    }

    #[test]
    fn adjacency_is_symmetric_without_self_loops() {
        for territory in TerritoryId::all() {
            assert!(!territory.is_adjacent(territory), "{territory} touches itself");
            for &other in territory.neighbours() {
                assert!(
                    other.is_adjacent(territory),
                    "{territory} -> {other} has no reverse edge"
                );
            }
        }
    }

    #[test]
    fn continents_partition_the_map() {
        let mut seen = EnumMap::<TerritoryId, u32>::default();
        for continent in Continent::ALL {
            let members = continent.iter_territories().collect::<Vec<_>>();
            assert_eq!(members.len(), continent.territory_count(), "{continent}");
            for territory in members {
                seen[territory] += 1;
            }
        }

        assert!(seen.values().all(|&x| x == 1));
        assert_eq!(
            Continent::ALL.iter().map(|x| x.territory_count()).sum::<usize>(),
            TERRITORY_COUNT
        );
    }

    #[test]
    fn ids_round_trip_through_parse() {
        for territory in TerritoryId::all() {
            assert_eq!(territory.id().parse::<TerritoryId>().unwrap(), territory);
        }
        for continent in Continent::ALL {
            assert_eq!(Continent::parse(continent.id()), Some(continent));
        }

        assert_eq!(TerritoryId::parse("eastern-us"), Some(TerritoryId::EasternUs));
        assert_eq!(TerritoryId::parse("atlantis"), None);
        assert!("atlantis".parse::<TerritoryId>().is_err());
    }

    #[test]
    fn string_adjacency_rejects_unknown_ids() {
        assert!(are_adjacent("alaska", "kamchatka"));
        assert!(!are_adjacent("alaska", "argentina"));
        assert!(!are_adjacent("alaska", "atlantis"));
        assert!(!are_adjacent("atlantis", "alaska"));
    }

    #[test]
    fn continent_bonuses() {
        assert_eq!(Continent::Asia.bonus(), 7);
        assert_eq!(Continent::NorthAmerica.bonus(), 5);
        assert_eq!(Continent::Europe.bonus(), 5);
        assert_eq!(Continent::Africa.bonus(), 3);
        assert_eq!(Continent::SouthAmerica.bonus(), 2);
        assert_eq!(Continent::Australia.bonus(), 2);
        assert_eq!(TerritoryId::Japan.continent().name(), "Asia");
    }
}
