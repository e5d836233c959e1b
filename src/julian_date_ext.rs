// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunation counting on the Julian Date axis.

use qtty::Days;

use super::instant::Time;
use super::scales::JD;

impl Time<JD> {
    /// Reference new moon used as the origin of lunation counting
    /// (JD 2 451 550.1, 2000-01-06).
    pub const REFERENCE_NEW_MOON: Self = Self::new(2_451_550.1);

    /// Mean synodic month: one full cycle of lunar phases.
    pub const SYNODIC_MONTH: Days = Days::new(29.530_588_853);

    /// Elapsed synodic months since [`Self::REFERENCE_NEW_MOON`].
    ///
    /// Negative before the reference, and increasing by exactly `1.0` per
    /// synodic month.
    #[inline]
    pub fn lunations(&self) -> f64 {
        (*self - Self::REFERENCE_NEW_MOON).value() / Self::SYNODIC_MONTH.value()
    }

    /// Inverse of [`Self::lunations`].
    #[inline]
    pub fn from_lunations(lunations: f64) -> Self {
        Self::REFERENCE_NEW_MOON + Self::SYNODIC_MONTH * lunations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_new_moon_is_zero_lunations() {
        assert_eq!(Time::<JD>::REFERENCE_NEW_MOON.lunations(), 0.0);
    }

    #[test]
    fn one_synodic_month_is_one_lunation() {
        let next = Time::<JD>::REFERENCE_NEW_MOON + Time::<JD>::SYNODIC_MONTH;
        assert!((next.lunations() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lunations_roundtrip() {
        for l in [-1234.75, -0.5, 0.0, 0.25, 17.125, 300.0] {
            let jd = Time::<JD>::from_lunations(l);
            assert!((jd.lunations() - l).abs() < 1e-9, "lunations {l}");
        }
    }
}
