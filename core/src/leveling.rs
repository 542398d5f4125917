//! Level progression derived from accumulated experience.
//!
//! Level `n` is reached at `50 * n * (n + 1)` experience, so the thresholds grow
//! quadratically: 0, 100, 300, 600, 1000, ...

/// Upper bound for a player's experience, inclusive.
pub const MAX_EXPERIENCE: i32 = 10_000_000;

/// Computes the level reached with the given amount of experience.
///
/// # Arguments
/// * `experience` - Accumulated experience, expected to be in `0..=MAX_EXPERIENCE`.
///
/// # Returns
/// * `floor((sqrt(2500 + 200 * experience) - 50) / 100)`
pub fn level(experience: i32) -> i32 {
    let radicand = 2500.0 + 200.0 * f64::from(experience);
    ((radicand.sqrt() - 50.0) / 100.0).floor() as i32
}

/// Computes how much experience is still missing to reach `level + 1`.
///
/// # Arguments
/// * `level` - Current level, as returned by [`level`].
/// * `experience` - Accumulated experience.
///
/// # Returns
/// * `50 * (level + 1) * (level + 2) - experience`
pub fn until_next_level(level: i32, experience: i32) -> i32 {
    let level = i64::from(level);
    (50 * (level + 1) * (level + 2) - i64::from(experience)) as i32
}

/// Experience needed to reach `level` from zero.
pub fn experience_for_level(level: i32) -> i32 {
    let level = i64::from(level);
    (50 * level * (level + 1)) as i32
}
