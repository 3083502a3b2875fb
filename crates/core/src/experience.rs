//! Experience points and levels.
//!
//! Users start at level 1 with zero experience. Advancing from level `L` to
//! `L + 1` costs `L * XP_PER_LEVEL_STEP` points, so the cumulative threshold
//! for level `L` is `XP_PER_LEVEL_STEP * L * (L - 1) / 2`.

pub const STARTING_LEVEL: i32 = 1;
pub const XP_PER_LEVEL_STEP: i64 = 100;

/// Cumulative experience required to reach `level`.
pub fn experience_for_level(level: i32) -> i64 {
    let l = i64::from(level.max(STARTING_LEVEL));
    XP_PER_LEVEL_STEP * l * (l - 1) / 2
}

/// Level reached with `experience` points in total.
pub fn level_for_experience(experience: i32) -> i32 {
    let xp = i64::from(experience.max(0));
    let mut level = STARTING_LEVEL;
    while experience_for_level(level + 1) <= xp {
        level += 1;
    }
    level
}
