//! Scoring module - line-clear points, level thresholds, and speed steps

use crate::types::{
    LEVEL_BASE_THRESHOLD, LEVEL_THRESHOLD_STEP, LINE_CLEAR_SCORE, MIN_TICK_MS,
    SPEEDUP_ROWS_THRESHOLD, TICK_DECREMENT_MS,
};

/// Points for clearing `rows` rows in one transition
pub fn line_clear_score(rows: u32) -> u32 {
    rows.saturating_mul(LINE_CLEAR_SCORE)
}

/// Score required to leave `level`: `100 + 100 * (level - 1)`.
///
/// Level 0 has a threshold of 0, so the first accepted step of a session
/// always promotes to level 1.
pub fn score_threshold(level: u32) -> u32 {
    LEVEL_BASE_THRESHOLD
        .saturating_add(LEVEL_THRESHOLD_STEP.saturating_mul(level))
        .saturating_sub(LEVEL_THRESHOLD_STEP)
}

/// Level after one transition; advances at most one level at a time
pub fn next_level(level: u32, score: u32) -> u32 {
    if score >= score_threshold(level) {
        level.saturating_add(1)
    } else {
        level
    }
}

/// Tick interval after a transition that cleared `rows_cleared` rows
pub fn next_tick_interval(current_ms: u32, rows_cleared: u32) -> u32 {
    if rows_cleared > SPEEDUP_ROWS_THRESHOLD {
        current_ms.saturating_sub(TICK_DECREMENT_MS).max(MIN_TICK_MS)
    } else {
        current_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 100);
        assert_eq!(line_clear_score(2), 200);
        assert_eq!(line_clear_score(4), 400);
    }

    #[test]
    fn test_score_threshold() {
        assert_eq!(score_threshold(0), 0);
        assert_eq!(score_threshold(1), 100);
        assert_eq!(score_threshold(2), 200);
        assert_eq!(score_threshold(10), 1000);
    }

    #[test]
    fn test_next_level_single_step() {
        assert_eq!(next_level(0, 0), 1);
        assert_eq!(next_level(1, 99), 1);
        assert_eq!(next_level(1, 100), 2);
        // Far past several thresholds still only advances once
        assert_eq!(next_level(1, 10_000), 2);
    }

    #[test]
    fn test_next_tick_interval() {
        assert_eq!(next_tick_interval(500, 0), 500);
        assert_eq!(next_tick_interval(500, 3), 500);
        assert_eq!(next_tick_interval(500, 4), 250);
        assert_eq!(next_tick_interval(250, 4), 100);
        assert_eq!(next_tick_interval(100, 4), 100);
    }
}
