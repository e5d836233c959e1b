// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scale-tagged day counts.
//!
//! [`Time<S>`] is a [`Days`] value whose origin is fixed by the marker
//! `S: TimeScale`.  Every scale is an affine offset of the Julian Day axis,
//! which is where the lunation arithmetic happens; millisecond
//! [`Timestamp`](crate::Timestamp)s reach it through the Unix-day scale.
//!
//! Civil UTC and the Julian Day axis are related by a fixed linear scaling.
//! No ΔT correction is applied.

use qtty::Days;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

// ═══════════════════════════════════════════════════════════════════════════
// Scales
// ═══════════════════════════════════════════════════════════════════════════

/// Marker for a day-count origin.
pub trait TimeScale: Copy + Clone + std::fmt::Debug + PartialEq + PartialOrd + 'static {
    /// Native day count to absolute Julian Day.
    fn to_jd(value: Days) -> Days;

    /// Absolute Julian Day to native day count.
    fn from_jd(jd: Days) -> Days;
}

// ═══════════════════════════════════════════════════════════════════════════
// Time<S>
// ═══════════════════════════════════════════════════════════════════════════

/// A day count on scale `S`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeScale> {
    days: Days,
    _scale: PhantomData<S>,
}

impl<S: TimeScale> Time<S> {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self::from_days(Days::new(value))
    }

    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self {
            days,
            _scale: PhantomData,
        }
    }

    /// Day count on this scale.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.days.value()
    }

    /// Same instant on scale `T`, going through the Julian Day.
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Time<T> {
        Time::from_days(T::from_jd(S::to_jd(self.days)))
    }
}

impl<S: TimeScale> Add<Days> for Time<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.days + rhs)
    }
}

impl<S: TimeScale> Sub for Time<S> {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.days - rhs.days
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// A point in time that can be shifted by a duration.
///
/// Endpoints of an [`Interval`](crate::Interval) implement this.
pub trait TimeInstant: Copy + Clone + PartialEq + PartialOrd + Sized {
    /// The duration type used for shifting.
    type Duration;

    fn add_duration(&self, duration: Self::Duration) -> Self;

    fn sub_duration(&self, duration: Self::Duration) -> Self;
}

#[cfg(test)]
mod tests {
    use super::super::scales::{UnixTime, JD};
    use super::*;

    #[test]
    fn unix_day_zero_is_the_unix_epoch_julian_day() {
        let epoch = Time::<UnixTime>::new(0.0);
        assert_eq!(epoch.to::<JD>().value(), 2_440_587.5);
        assert_eq!(epoch.to::<JD>().to::<UnixTime>().value(), 0.0);
    }

    #[test]
    fn shifting_and_differences_are_in_days() {
        let a = Time::<JD>::new(2_451_545.0);
        let b = a + Days::new(2.5);
        assert_eq!(b.value(), 2_451_547.5);
        assert_eq!(b - a, Days::new(2.5));
        assert!(b > a);
    }
}
