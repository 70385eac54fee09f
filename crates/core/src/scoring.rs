//! Scoring module - line-clear points and fall speed progression
//!
//! Points use the classic level-multiplied table
//! `{1: 40, 2: 100, 3: 300, 4: 1200} x (level + 1)`, where the level is
//! `lines / 10` before the clear is counted. The fall period drops by 100 ms
//! every 10 lines and bottoms out at 100 ms.

use crate::types::{
    BASE_FALL_MS, FALL_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_FALL_MS, SOFT_DROP_FALL_MS,
};

/// Calculate line clear score
/// lines: number of lines cleared (0-4)
/// level: current level (0-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level.saturating_add(1))
}

/// Level management
/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Base fall period for a lines-cleared total
pub fn fall_speed_ms(total_lines: u32) -> u32 {
    let reduction = calculate_level(total_lines).saturating_mul(FALL_STEP_MS);
    BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS)
}

/// Period the fall timer should actually wait, given the soft-drop flag.
/// Soft drop never lengthens the period.
pub fn effective_fall_ms(base_ms: u32, soft_drop: bool) -> u32 {
    if soft_drop {
        base_ms.min(SOFT_DROP_FALL_MS)
    } else {
        base_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_scores() {
        // Level 0
        assert_eq!(calculate_line_score(0, 0), 0);
        assert_eq!(calculate_line_score(1, 0), 40);
        assert_eq!(calculate_line_score(2, 0), 100);
        assert_eq!(calculate_line_score(3, 0), 300);
        assert_eq!(calculate_line_score(4, 0), 1200);

        // Level 5
        assert_eq!(calculate_line_score(1, 5), 40 * 6);
        assert_eq!(calculate_line_score(4, 5), 1200 * 6);
    }

    #[test]
    fn test_scores_increase_with_lines() {
        for level in [0, 3, 12] {
            let scores: Vec<_> = (0..=4).map(|n| calculate_line_score(n, level)).collect();
            assert!(scores.windows(2).all(|w| w[0] < w[1]), "{:?}", scores);
        }
    }

    #[test]
    fn test_out_of_range_lines_score_nothing() {
        assert_eq!(calculate_line_score(5, 0), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 0);
        assert_eq!(calculate_level(9), 0);
        assert_eq!(calculate_level(10), 1);
        assert_eq!(calculate_level(29), 2);
        assert_eq!(calculate_level(100), 10);
    }

    #[test]
    fn test_fall_speed_steps_and_floor() {
        assert_eq!(fall_speed_ms(0), 1000);
        assert_eq!(fall_speed_ms(9), 1000);
        assert_eq!(fall_speed_ms(10), 900);
        assert_eq!(fall_speed_ms(45), 600);
        assert_eq!(fall_speed_ms(90), 100);
        assert_eq!(fall_speed_ms(500), 100);
    }

    #[test]
    fn test_soft_drop_interval() {
        assert_eq!(effective_fall_ms(1000, false), 1000);
        assert_eq!(effective_fall_ms(1000, true), 50);
        assert_eq!(effective_fall_ms(100, true), 50);
    }
}
