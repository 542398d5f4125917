use serde::{Deserialize, Deserializer, Serialize};

use super::player::{Player, Profession, Race};

/// Payload of `POST /players`.
///
/// Every field is optional on the wire so that a missing field is reported as a
/// validation failure instead of a deserialization failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<i64>,
    pub banned: Option<bool>,
    pub experience: Option<i32>,
}

/// A field of a partial update.
///
/// `Missing` means the key was not in the payload at all, `Null` means it was
/// sent as `null`. Neither changes the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    /// The supplied value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Missing | Patch::Null => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Payload of `POST /players/{id}`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub race: Patch<Race>,
    #[serde(default)]
    pub profession: Patch<Profession>,
    #[serde(default)]
    pub birthday: Patch<i64>,
    #[serde(default)]
    pub banned: Patch<bool>,
    #[serde(default)]
    pub experience: Patch<i32>,
}

impl UpdatePlayerRequest {
    /// True when the payload does not carry a single usable value.
    pub fn is_empty(&self) -> bool {
        self.name.value().is_none()
            && self.title.value().is_none()
            && self.race.value().is_none()
            && self.profession.value().is_none()
            && self.birthday.value().is_none()
            && self.banned.value().is_none()
            && self.experience.value().is_none()
    }

    /// Copies every supplied value onto `player`.
    ///
    /// Derived level fields are only recomputed when the experience actually
    /// changes. The request must have been validated beforehand.
    ///
    /// # Returns
    /// * `true` if at least one field of `player` changed.
    pub fn apply_to(&self, player: &mut Player) -> bool {
        let mut changed = false;

        if let Some(name) = self.name.value() {
            if *name != player.name {
                player.name = name.clone();
                changed = true;
            }
        }
        if let Some(title) = self.title.value() {
            if *title != player.title {
                player.title = title.clone();
                changed = true;
            }
        }
        if let Some(&race) = self.race.value() {
            changed |= race != player.race;
            player.race = race;
        }
        if let Some(&profession) = self.profession.value() {
            changed |= profession != player.profession;
            player.profession = profession;
        }
        if let Some(&birthday) = self.birthday.value() {
            changed |= birthday != player.birthday;
            player.birthday = birthday;
        }
        if let Some(&banned) = self.banned.value() {
            changed |= banned != player.banned;
            player.banned = banned;
        }
        if let Some(&experience) = self.experience.value() {
            if experience != player.experience() {
                player.set_experience(experience);
                changed = true;
            }
        }

        changed
    }
}

/// Player as returned by every endpoint that yields records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub banned: bool,
    pub birthday: i64,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            title: player.title.clone(),
            race: player.race,
            profession: player.profession,
            banned: player.banned,
            birthday: player.birthday,
            experience: player.experience(),
            level: player.level(),
            until_next_level: player.until_next_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Patch, PlayerResponse, UpdatePlayerRequest};
    use crate::types::{NewPlayer, Player, Profession, Race};

    #[test]
    fn update_request_distinguishes_missing_null_and_value() {
        let request: UpdatePlayerRequest =
            serde_json::from_str(r#"{"name": null, "experience": 42}"#).unwrap();

        assert_eq!(request.name, Patch::Null);
        assert_eq!(request.title, Patch::Missing);
        assert_eq!(request.experience, Patch::Value(42));
        assert!(!request.is_empty());
    }

    #[test]
    fn update_request_with_only_nulls_is_empty() {
        let request: UpdatePlayerRequest =
            serde_json::from_str(r#"{"title": null, "banned": null}"#).unwrap();
        assert!(request.is_empty());

        let request: UpdatePlayerRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
        assert!(request.race.is_missing());
    }

    fn bob() -> Player {
        Player::from_new(
            3,
            NewPlayer {
                name: "Bob".to_string(),
                title: "Knight".to_string(),
                race: Race::Human,
                profession: Profession::Warrior,
                birthday: 946_684_800_000,
                banned: false,
                experience: 5000,
            },
        )
    }

    #[test]
    fn apply_empty_update_changes_nothing() {
        let mut player = bob();
        let before = player.clone();
        assert!(!UpdatePlayerRequest::default().apply_to(&mut player));
        assert_eq!(player, before);
    }

    #[test]
    fn apply_experience_update_recomputes_level_only() {
        let mut player = bob();
        let request = UpdatePlayerRequest {
            experience: Patch::Value(100),
            name: Patch::Null,
            ..Default::default()
        };

        assert!(request.apply_to(&mut player));
        assert_eq!(player.experience(), 100);
        assert_eq!(player.level(), 1);
        assert_eq!(player.until_next_level(), 200);
        assert_eq!(player.name, "Bob");
        assert_eq!(player.title, "Knight");
    }

    #[test]
    fn apply_same_values_reports_no_change() {
        let mut player = bob();
        let request = UpdatePlayerRequest {
            name: Patch::Value("Bob".to_string()),
            experience: Patch::Value(5000),
            banned: Patch::Value(false),
            ..Default::default()
        };
        assert!(!request.apply_to(&mut player));
    }

    #[test]
    fn response_serializes_with_camel_case_fields() {
        let player = bob();

        let json = serde_json::to_value(PlayerResponse::from(&player)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["race"], "HUMAN");
        assert_eq!(json["profession"], "WARRIOR");
        assert_eq!(json["level"], 9);
        assert_eq!(json["untilNextLevel"], 500);
    }
}
