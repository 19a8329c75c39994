// In crates/strategies/src/crossover.rs

use crate::Result;
use crate::window::RollingWindow;
use core_types::Side;

/// Outcome of comparing a fast and a slow series across two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cross {
    #[default]
    None,
    /// Fast was strictly below slow and is now at or above it.
    Up,
    /// Fast was strictly above slow and is now at or below it.
    Down,
}

impl Cross {
    /// The side of the position this crossover opens.
    pub fn entry_side(self) -> Option<Side> {
        match self {
            Cross::Up => Some(Side::Long),
            Cross::Down => Some(Side::Short),
            Cross::None => None,
        }
    }
}

/// Compares two warmed-up windows. Fails with `InsufficientHistory` when
/// either window holds fewer than two values.
pub fn detect(fast: &RollingWindow<f64>, slow: &RollingWindow<f64>) -> Result<Cross> {
    let (fast_now, fast_prev) = (fast.get(0)?, fast.get(1)?);
    let (slow_now, slow_prev) = (slow.get(0)?, slow.get(1)?);
    Ok(classify(fast_now, fast_prev, slow_now, slow_prev))
}

/// The crossover rule on raw values.
pub fn classify(fast_now: f64, fast_prev: f64, slow_now: f64, slow_prev: f64) -> Cross {
    match conditions(fast_now, fast_prev, slow_now, slow_prev) {
        (true, false) => Cross::Up,
        (false, true) => Cross::Down,
        // Both at once cannot happen while the previous-bar comparison is strict.
        _ => Cross::None,
    }
}

fn conditions(fast_now: f64, fast_prev: f64, slow_now: f64, slow_prev: f64) -> (bool, bool) {
    let up = fast_now >= slow_now && fast_prev < slow_prev;
    let down = fast_now <= slow_now && fast_prev > slow_prev;
    (up, down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use proptest::prelude::*;

    fn window(current: f64, previous: f64) -> RollingWindow<f64> {
        let mut w = RollingWindow::new();
        w.push(previous);
        w.push(current);
        w
    }

    #[test]
    fn fast_overtaking_slow_is_cross_up() {
        assert_eq!(detect(&window(11.0, 9.0), &window(10.0, 10.0)).unwrap(), Cross::Up);
    }

    #[test]
    fn fast_falling_through_slow_is_cross_down() {
        assert_eq!(detect(&window(9.0, 11.0), &window(10.0, 10.0)).unwrap(), Cross::Down);
    }

    #[test]
    fn touching_from_below_counts_as_cross_up() {
        assert_eq!(classify(10.0, 9.0, 10.0, 10.0), Cross::Up);
    }

    #[test]
    fn touching_from_above_counts_as_cross_down() {
        assert_eq!(classify(10.0, 11.0, 10.0, 10.0), Cross::Down);
    }

    #[test]
    fn leaving_a_tie_is_not_a_cross() {
        // Equal on the previous bar: the strict comparison fails both ways.
        assert_eq!(classify(11.0, 10.0, 10.0, 10.0), Cross::None);
        assert_eq!(classify(9.0, 10.0, 10.0, 10.0), Cross::None);
    }

    #[test]
    fn equal_windows_on_both_bars_are_none() {
        assert_eq!(detect(&window(5.0, 5.0), &window(5.0, 5.0)).unwrap(), Cross::None);
        assert_eq!(conditions(5.0, 5.0, 5.0, 5.0), (false, false));
    }

    #[test]
    fn staying_on_one_side_is_none() {
        assert_eq!(classify(12.0, 11.0, 10.0, 10.0), Cross::None);
        assert_eq!(classify(8.0, 9.0, 10.0, 10.0), Cross::None);
    }

    #[test]
    fn cold_window_is_insufficient_history() {
        let mut cold = RollingWindow::new();
        cold.push(1.0);
        assert!(matches!(
            detect(&cold, &window(1.0, 1.0)),
            Err(Error::InsufficientHistory { offset: 1, len: 1 })
        ));
    }

    #[test]
    fn entry_side_maps_direction() {
        assert_eq!(Cross::Up.entry_side(), Some(Side::Long));
        assert_eq!(Cross::Down.entry_side(), Some(Side::Short));
        assert_eq!(Cross::None.entry_side(), None);
    }

    // Small integer grid so ties are common.
    fn arb_level() -> impl Strategy<Value = f64> {
        (-5i32..5).prop_map(f64::from)
    }

    proptest! {
        #[test]
        fn up_and_down_are_mutually_exclusive(
            fast_now in arb_level(),
            fast_prev in arb_level(),
            slow_now in arb_level(),
            slow_prev in arb_level(),
        ) {
            let (up, down) = conditions(fast_now, fast_prev, slow_now, slow_prev);
            prop_assert!(!(up && down));
        }

        #[test]
        fn exclusive_for_arbitrary_floats(
            fast_now in -1e9..1e9_f64,
            fast_prev in -1e9..1e9_f64,
            slow_now in -1e9..1e9_f64,
            slow_prev in -1e9..1e9_f64,
        ) {
            let (up, down) = conditions(fast_now, fast_prev, slow_now, slow_prev);
            prop_assert!(!(up && down));
        }
    }
}
