//! Level derivation from XP. Pure functions, nothing stored.

/// XP needed to leave `level`: `level² × 100`.
pub fn next_level_threshold(level: u32) -> u64 {
    let level = u64::from(level);
    level.saturating_mul(level).saturating_mul(100)
}

/// Level reached with `total_xp`, starting at 1.
pub fn level_for_xp(total_xp: u64) -> u32 {
    let mut level = 1;
    while level < u32::MAX && total_xp >= next_level_threshold(level) {
        level += 1;
    }
    level
}
