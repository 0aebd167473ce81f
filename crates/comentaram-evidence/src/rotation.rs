//! Round-robin rotation used by the legacy board.
//!
//! Before the evidence engine, each category simply promoted one topic to hot
//! and one to cool on every slow tick, walking through the category in order.

/// Energy push for the rotated-in hot topic.
pub const ROTATION_HOT_INCREMENT: f64 = 0.010;

/// Energy drain for the rotated-in cool topic.
pub const ROTATION_COOL_DECREMENT: f64 = 0.008;

/// Relaxation toward baseline for everything else.
pub const ROTATION_RELAX: f64 = 0.02;

/// Indices of the hot and cool picks for a category of `len` topics.
///
/// Returns `None` for an empty category. With a single topic both picks are
/// the same index; callers give hot precedence.
///
/// ```
/// use comentaram_evidence::rotation_picks;
///
/// assert_eq!(rotation_picks(0, 7), Some((0, 1)));
/// assert_eq!(rotation_picks(6, 7), Some((6, 0)));
/// assert_eq!(rotation_picks(3, 0), None);
/// ```
pub const fn rotation_picks(tick: u64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as u64;
    Some(((tick % len) as usize, ((tick + 1) % len) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_walk_the_category() {
        let picks: Vec<_> = (0..5).filter_map(|t| rotation_picks(t, 3)).collect();
        assert_eq!(picks, vec![(0, 1), (1, 2), (2, 0), (0, 1), (1, 2)]);
    }

    #[test]
    fn single_topic_collides() {
        assert_eq!(rotation_picks(9, 1), Some((0, 0)));
    }

    #[test]
    fn empty_category_has_no_picks() {
        assert_eq!(rotation_picks(0, 0), None);
    }

    #[test]
    fn hot_and_cool_differ_when_possible() {
        for len in 2..10 {
            for tick in 0..30 {
                let (hot, cool) = rotation_picks(tick, len).unwrap();
                assert_ne!(hot, cool);
            }
        }
    }
}
