// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time intervals.
//!
//! - [`Interval<T>`]: interval over any [`TimeInstant`]
//! - [`Window`]: millisecond interval used to clip timeline items

use super::{TimeInstant, Timestamp};
use std::fmt;

/// Represents an interval between two instants.
///
/// # Examples
///
/// ```
/// use qtty::Milliseconds;
/// use solunar::{Timestamp, Window};
///
/// let now = Timestamp::from_millis(10_000);
/// let window = Window::around(now, Milliseconds::new(1_000.0), Milliseconds::new(5_000.0));
///
/// assert!(window.contains_open(&Timestamp::from_millis(12_000)));
/// assert!(!window.contains_open(&Timestamp::from_millis(9_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Millisecond-timestamp interval.
pub type Window = Interval<Timestamp>;

impl<T: TimeInstant> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Interval reaching `before` into the past and `after` into the future
    /// of `center`.
    pub fn around(center: T, before: T::Duration, after: T::Duration) -> Self {
        Self::new(center.sub_duration(before), center.add_duration(after))
    }

    /// Whether `instant` lies strictly inside `(start, end)`.
    pub fn contains_open(&self, instant: &T) -> bool {
        *instant > self.start && *instant < self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::{Hours, Millisecond, Milliseconds};

    #[test]
    fn test_window_around() {
        let now = Timestamp::from_millis(100 * 3_600_000);
        let window = Window::around(
            now,
            Hours::new(6.0).to::<Millisecond>(),
            Hours::new(18.0).to::<Millisecond>(),
        );
        let eps = Milliseconds::new(1e-3);
        assert!((window.start - Timestamp::from_millis(94 * 3_600_000)).abs() < eps);
        assert!((window.end - Timestamp::from_millis(118 * 3_600_000)).abs() < eps);
    }

    #[test]
    fn test_contains_open_excludes_edges() {
        let w = Window::new(Timestamp::from_millis(0), Timestamp::from_millis(10));
        assert!(!w.contains_open(&Timestamp::from_millis(0)));
        assert!(w.contains_open(&Timestamp::from_millis(5)));
        assert!(!w.contains_open(&Timestamp::from_millis(10)));
    }

    #[test]
    fn test_window_display() {
        let w = Window::new(Timestamp::from_millis(0), Timestamp::from_millis(10));
        assert_eq!(w.to_string(), "0 to 10");
    }
}
