// In crates/strategies/src/window.rs

use crate::{Error, Result};
use std::collections::VecDeque;

/// Number of values a window keeps: the current bar and the one before it.
pub const WINDOW_CAPACITY: usize = 2;

/// Most-recent-first buffer of the last two values of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow<T> {
    values: VecDeque<T>,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new() -> Self {
        Self {
            values: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
        }
    }

    /// Inserts `value` as the current entry and evicts anything beyond capacity.
    pub fn push(&mut self, value: T) {
        self.values.push_front(value);
        self.values.truncate(WINDOW_CAPACITY);
    }

    /// `offset = 0` is the current value, `offset = 1` the previous one.
    pub fn get(&self, offset: usize) -> Result<T> {
        self.values
            .get(offset)
            .copied()
            .ok_or(Error::InsufficientHistory {
                offset,
                len: self.values.len(),
            })
    }

    pub fn current(&self) -> Option<T> {
        self.values.front().copied()
    }

    pub fn previous(&self) -> Option<T> {
        self.values.get(1).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True once both the current and the previous value are present.
    pub fn is_warm(&self) -> bool {
        self.values.len() == WINDOW_CAPACITY
    }
}

impl<T: Copy> Default for RollingWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn previous_before_warmup_is_insufficient_history() {
        let mut w = RollingWindow::new();
        assert!(matches!(
            w.get(0),
            Err(Error::InsufficientHistory { offset: 0, len: 0 })
        ));
        w.push(1.0);
        assert_eq!(w.get(0).unwrap(), 1.0);
        assert!(matches!(
            w.get(1),
            Err(Error::InsufficientHistory { offset: 1, len: 1 })
        ));
        assert!(!w.is_warm());
    }

    #[test]
    fn push_is_most_recent_first() {
        let mut w = RollingWindow::new();
        w.push(1.0);
        w.push(2.0);
        w.push(3.0);
        assert_eq!(w.get(0).unwrap(), 3.0);
        assert_eq!(w.get(1).unwrap(), 2.0);
        assert_eq!(w.current(), Some(3.0));
        assert_eq!(w.previous(), Some(2.0));
        assert!(w.get(2).is_err());
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(values in prop::collection::vec(-1e6..1e6_f64, 0..64)) {
            let mut w = RollingWindow::new();
            for (i, v) in values.iter().enumerate() {
                w.push(*v);
                prop_assert!(w.len() <= WINDOW_CAPACITY);
                if i + 1 >= WINDOW_CAPACITY {
                    prop_assert_eq!(w.len(), WINDOW_CAPACITY);
                    prop_assert!(w.is_warm());
                }
            }
        }

        #[test]
        fn keeps_last_two_pushed(values in prop::collection::vec(-1e6..1e6_f64, 2..64)) {
            let mut w = RollingWindow::new();
            for v in &values {
                w.push(*v);
            }
            let n = values.len();
            prop_assert_eq!(w.get(0).unwrap(), values[n - 1]);
            prop_assert_eq!(w.get(1).unwrap(), values[n - 2]);
        }
    }
}
