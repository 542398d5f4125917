//! Field rules for player writes.

use std::fmt;

use chrono::{DateTime, Datelike};

use crate::leveling::MAX_EXPERIENCE;
use crate::types::{CreatePlayerRequest, NewPlayer, UpdatePlayerRequest};

pub const MAX_NAME_LENGTH: usize = 12;
pub const MAX_TITLE_LENGTH: usize = 30;
/// Earliest accepted birth year, inclusive.
pub const MIN_BIRTH_YEAR: i32 = 2000;
/// Latest accepted birth year, exclusive.
pub const MAX_BIRTH_YEAR: i32 = 3000;

/// A rejected field together with the rule it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Rejects ids that can never have been assigned by a store.
pub fn validate_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::new("id", format!("must be positive, got {id}")));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("name", "must not be empty"));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::new(
            "name",
            format!("must be at most {MAX_NAME_LENGTH} characters, got {len}"),
        ));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::new(
            "title",
            format!("must be at most {MAX_TITLE_LENGTH} characters, got {len}"),
        ));
    }
    Ok(())
}

pub fn validate_experience(experience: i32) -> Result<(), ValidationError> {
    if !(0..=MAX_EXPERIENCE).contains(&experience) {
        return Err(ValidationError::new(
            "experience",
            format!("must be within 0..={MAX_EXPERIENCE}, got {experience}"),
        ));
    }
    Ok(())
}

/// Birthdays are epoch milliseconds whose UTC year lies in
/// `MIN_BIRTH_YEAR..MAX_BIRTH_YEAR`.
pub fn validate_birthday(birthday: i64) -> Result<(), ValidationError> {
    if birthday < 0 {
        return Err(ValidationError::new(
            "birthday",
            format!("must not be negative, got {birthday}"),
        ));
    }

    let year = DateTime::from_timestamp_millis(birthday)
        .map(|date| date.year())
        .ok_or_else(|| ValidationError::new("birthday", "is not a representable date"))?;

    if !(MIN_BIRTH_YEAR..MAX_BIRTH_YEAR).contains(&year) {
        return Err(ValidationError::new(
            "birthday",
            format!("year must be within {MIN_BIRTH_YEAR}..{MAX_BIRTH_YEAR}, got {year}"),
        ));
    }
    Ok(())
}

/// Checks a create payload and turns it into a storable player.
///
/// # Arguments
/// * `request` - The deserialized `POST /players` body.
///
/// # Returns
/// * `Ok(NewPlayer)` when every required field is present and within bounds.
/// * `Err(ValidationError)` naming the first offending field otherwise.
pub fn validate_create(request: &CreatePlayerRequest) -> Result<NewPlayer, ValidationError> {
    let name = request
        .name
        .as_ref()
        .ok_or_else(|| ValidationError::missing("name"))?;
    validate_name(name)?;

    let title = request
        .title
        .as_ref()
        .ok_or_else(|| ValidationError::missing("title"))?;
    validate_title(title)?;

    let race = request.race.ok_or_else(|| ValidationError::missing("race"))?;
    let profession = request
        .profession
        .ok_or_else(|| ValidationError::missing("profession"))?;

    let experience = request
        .experience
        .ok_or_else(|| ValidationError::missing("experience"))?;
    validate_experience(experience)?;

    let birthday = request
        .birthday
        .ok_or_else(|| ValidationError::missing("birthday"))?;
    validate_birthday(birthday)?;

    Ok(NewPlayer {
        name: name.clone(),
        title: title.clone(),
        race,
        profession,
        birthday,
        banned: request.banned.unwrap_or(false),
        experience,
    })
}

/// Checks the supplied fields of a partial update. Absent fields are not checked.
pub fn validate_update(request: &UpdatePlayerRequest) -> Result<(), ValidationError> {
    if let Some(name) = request.name.value() {
        validate_name(name)?;
    }
    if let Some(title) = request.title.value() {
        validate_title(title)?;
    }
    if let Some(experience) = request.experience.value() {
        validate_experience(*experience)?;
    }
    if let Some(birthday) = request.birthday.value() {
        validate_birthday(*birthday)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Patch, Profession, Race};

    // 2000-01-01T00:00:00Z
    const Y2K: i64 = 946_684_800_000;
    // 3000-01-01T00:00:00Z
    const Y3K: i64 = 32_503_680_000_000;

    fn valid_create() -> CreatePlayerRequest {
        CreatePlayerRequest {
            name: Some("Bob".to_string()),
            title: Some("Knight".to_string()),
            race: Some(Race::Human),
            profession: Some(Profession::Warrior),
            birthday: Some(Y2K),
            banned: None,
            experience: Some(5000),
        }
    }

    #[test]
    fn id_must_be_positive() {
        assert!(validate_id(1).is_ok());
        assert_eq!(validate_id(0).unwrap_err().field, "id");
        assert_eq!(validate_id(-1).unwrap_err().field, "id");
    }

    #[test]
    fn create_accepts_valid_payload_and_defaults_banned() {
        let new_player = validate_create(&valid_create()).unwrap();
        assert_eq!(new_player.name, "Bob");
        assert!(!new_player.banned);
        assert_eq!(new_player.experience, 5000);
    }

    #[test]
    fn create_rejects_missing_fields() {
        let cases: [(&str, fn(&mut CreatePlayerRequest)); 6] = [
            ("name", |r| r.name = None),
            ("title", |r| r.title = None),
            ("race", |r| r.race = None),
            ("profession", |r| r.profession = None),
            ("experience", |r| r.experience = None),
            ("birthday", |r| r.birthday = None),
        ];

        for (field, clear) in cases {
            let mut request = valid_create();
            clear(&mut request);
            let err = validate_create(&request).unwrap_err();
            assert_eq!(err.field, field);
        }
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("").is_err());
        assert!(validate_name("a").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
        // Counted in characters, not bytes.
        assert!(validate_name(&"é".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn title_length_bounds() {
        assert!(validate_title("").is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn experience_bounds_are_inclusive() {
        assert!(validate_experience(0).is_ok());
        assert!(validate_experience(MAX_EXPERIENCE).is_ok());
        assert!(validate_experience(-1).is_err());
        assert!(validate_experience(MAX_EXPERIENCE + 1).is_err());
    }

    #[test]
    fn birthday_year_window() {
        assert!(validate_birthday(-1).is_err());
        assert!(validate_birthday(0).is_err());
        assert!(validate_birthday(Y2K - 1).is_err());
        assert!(validate_birthday(Y2K).is_ok());
        assert!(validate_birthday(Y3K - 1).is_ok());
        assert!(validate_birthday(Y3K).is_err());
        assert!(validate_birthday(i64::MAX).is_err());
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        assert!(validate_update(&UpdatePlayerRequest::default()).is_ok());

        let request = UpdatePlayerRequest {
            name: Patch::Null,
            experience: Patch::Value(MAX_EXPERIENCE + 1),
            ..Default::default()
        };
        assert_eq!(validate_update(&request).unwrap_err().field, "experience");

        let request = UpdatePlayerRequest {
            name: Patch::Value(String::new()),
            ..Default::default()
        };
        assert_eq!(validate_update(&request).unwrap_err().field, "name");

        let request = UpdatePlayerRequest {
            birthday: Patch::Value(-5),
            ..Default::default()
        };
        assert_eq!(validate_update(&request).unwrap_err().field, "birthday");
    }

    #[test]
    fn error_display_names_the_field() {
        let err = validate_id(0).unwrap_err();
        assert_eq!(err.to_string(), "id must be positive, got 0");
    }
}
