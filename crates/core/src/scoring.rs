//! Scoring module - line-clear points, levels and the countdown curve
//!
//! - Points: `lines * blocks * 10 * multiplier`, where `multiplier` is the
//!   value before this clear increments it
//! - Level: `pending_score / 1000`
//! - Countdown: `max(2500, 12000 - 500 * level)` milliseconds

use crate::types::{BASE_TIMER_MS, MIN_TIMER_MS, POINTS_PER_BLOCK, POINTS_PER_LEVEL, TIMER_STEP_MS};

/// Points for clearing `lines` full rows/columns covering `blocks` distinct
/// cells at the given multiplier
pub fn line_clear_score(lines: u32, blocks: u32, multiplier: u32) -> u32 {
    lines
        .saturating_mul(blocks)
        .saturating_mul(POINTS_PER_BLOCK)
        .saturating_mul(multiplier)
}

/// Level reached at `score`
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL
}

/// Countdown length at `level`, in milliseconds
pub fn timer_delay_ms(level: u32) -> u32 {
    BASE_TIMER_MS
        .saturating_sub(TIMER_STEP_MS.saturating_mul(level))
        .max(MIN_TIMER_MS)
}
