//! Player record and the enumerations it is built from.

use serde::{Deserialize, Serialize};

use crate::leveling;

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

/// Field a player listing can be sorted by. Sorting is always ascending.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl Race {
    pub const ALL: [Race; 7] = [
        Race::Human,
        Race::Dwarf,
        Race::Elf,
        Race::Giant,
        Race::Orc,
        Race::Troll,
        Race::Hobbit,
    ];

    /// Parses the upper-case wire name (e.g. `"HOBBIT"`).
    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|race| race.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Human => "HUMAN",
            Race::Dwarf => "DWARF",
            Race::Elf => "ELF",
            Race::Giant => "GIANT",
            Race::Orc => "ORC",
            Race::Troll => "TROLL",
            Race::Hobbit => "HOBBIT",
        }
    }
}

impl Profession {
    pub const ALL: [Profession; 8] = [
        Profession::Warrior,
        Profession::Rogue,
        Profession::Sorcerer,
        Profession::Cleric,
        Profession::Paladin,
        Profession::Nazgul,
        Profession::Warlock,
        Profession::Druid,
    ];

    /// Parses the upper-case wire name (e.g. `"NAZGUL"`).
    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|profession| profession.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profession::Warrior => "WARRIOR",
            Profession::Rogue => "ROGUE",
            Profession::Sorcerer => "SORCERER",
            Profession::Cleric => "CLERIC",
            Profession::Paladin => "PALADIN",
            Profession::Nazgul => "NAZGUL",
            Profession::Warlock => "WARLOCK",
            Profession::Druid => "DRUID",
        }
    }
}

impl PlayerOrder {
    pub const ALL: [PlayerOrder; 5] = [
        PlayerOrder::Id,
        PlayerOrder::Name,
        PlayerOrder::Experience,
        PlayerOrder::Birthday,
        PlayerOrder::Level,
    ];

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerOrder::Id => "ID",
            PlayerOrder::Name => "NAME",
            PlayerOrder::Experience => "EXPERIENCE",
            PlayerOrder::Birthday => "BIRTHDAY",
            PlayerOrder::Level => "LEVEL",
        }
    }
}

/// Fields of a player that has passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    /// Milliseconds since the Unix epoch.
    pub birthday: i64,
    pub banned: bool,
    pub experience: i32,
}

/// A stored player.
///
/// `level` and `until_next_level` are private so they can only change together
/// with `experience` (see [`Player::set_experience`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: i64,
    pub banned: bool,
    experience: i32,
    level: i32,
    until_next_level: i32,
}

impl Player {
    /// Builds a stored player from validated fields and the id the store assigned.
    pub fn from_new(id: i64, new_player: NewPlayer) -> Self {
        let mut player = Self {
            id,
            name: new_player.name,
            title: new_player.title,
            race: new_player.race,
            profession: new_player.profession,
            birthday: new_player.birthday,
            banned: new_player.banned,
            experience: 0,
            level: 0,
            until_next_level: 0,
        };
        player.set_experience(new_player.experience);
        player
    }

    pub fn experience(&self) -> i32 {
        self.experience
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn until_next_level(&self) -> i32 {
        self.until_next_level
    }

    /// Sets experience and recomputes the derived level fields.
    pub fn set_experience(&mut self, experience: i32) {
        self.experience = experience;
        self.level = leveling::level(experience);
        self.until_next_level = leveling::until_next_level(self.level, experience);
    }
}
