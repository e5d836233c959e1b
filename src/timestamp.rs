// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Millisecond timestamps and clocks.
//!
//! A [`Timestamp`] counts milliseconds since the Unix epoch.  It is kept as
//! an `f64` so instants computed from lunar phases keep their sub-millisecond
//! part: a cursor produced from a generated event decodes back to exactly the
//! same instant.

use chrono::{DateTime, Utc};
use qtty::Milliseconds;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::instant::{Time, TimeInstant};
use super::scales::{UnixTime, JD};
use super::JulianDate;

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The Unix epoch itself.
    pub const EPOCH: Self = Self(0.0);

    /// Create from (possibly fractional) milliseconds.
    #[inline]
    pub const fn from_millis_f64(millis: f64) -> Self {
        Self(millis)
    }

    /// Create from whole milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis as f64)
    }

    /// Raw millisecond value.
    #[inline]
    pub const fn millis(&self) -> f64 {
        self.0
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Julian Day of this instant: `millis / 86 400 000 + 2 440 587.5`.
    #[inline]
    pub fn to_julian(&self) -> JulianDate {
        Time::<UnixTime>::new(self.0 / MS_PER_DAY).to::<JD>()
    }

    /// Inverse of [`Self::to_julian`].
    #[inline]
    pub fn from_julian(jd: JulianDate) -> Self {
        Self(jd.to::<UnixTime>().value() * MS_PER_DAY)
    }

    /// Build from a chrono UTC datetime.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let millis = datetime.timestamp_millis() as f64;
        let sub_milli = (datetime.timestamp_subsec_nanos() % 1_000_000) as f64 / 1e6;
        Self(millis + sub_milli)
    }

    /// Convert to a chrono UTC datetime, `None` outside chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let whole = self.0.floor();
        let nanos = ((self.0 - whole) * 1e6) as i64;
        DateTime::<Utc>::from_timestamp_millis(whole as i64)?
            .checked_add_signed(chrono::Duration::nanoseconds(nanos))
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Milliseconds> for Timestamp {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Milliseconds) -> Self::Output {
        Self(self.0 + rhs.value())
    }
}

impl Sub<Milliseconds> for Timestamp {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Milliseconds) -> Self::Output {
        Self(self.0 - rhs.value())
    }
}

impl Sub for Timestamp {
    type Output = Milliseconds;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Milliseconds::new(self.0 - rhs.0)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<DateTime<Utc>> for Timestamp {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

// ── Cursor text form ──────────────────────────────────────────────────────

/// Shortest decimal representation that parses back to the same value.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Self)
    }
}

impl TimeInstant for Timestamp {
    type Duration = Milliseconds;

    #[inline]
    fn add_duration(&self, duration: Self::Duration) -> Self {
        *self + duration
    }

    #[inline]
    fn sub_duration(&self, duration: Self::Duration) -> Self {
        *self - duration
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Clocks
// ═══════════════════════════════════════════════════════════════════════════

/// Source of "now" for providers that default to the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use qtty::Days;

    #[test]
    fn epoch_is_unix_julian_day() {
        assert_eq!(Timestamp::EPOCH.to_julian().value(), 2_440_587.5);
        assert_eq!(Timestamp::from_julian(JulianDate::new(2_440_587.5)), Timestamp::EPOCH);
    }

    #[test]
    fn j2000_timestamp() {
        // 2000-01-01T12:00:00Z
        let ts = Timestamp::from_millis(946_728_000_000);
        assert!((ts.to_julian().value() - 2_451_545.0).abs() < 1e-9);
        let back = Timestamp::from_julian(JulianDate::new(2_451_545.0));
        assert!((back - ts).abs() < Milliseconds::new(1.0));
    }

    #[test]
    fn datetime_roundtrip_keeps_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 4, 18, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.millis(), dt.timestamp_millis() as f64);
        assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn fractional_millis_survive_datetime() {
        let ts = Timestamp::from_millis_f64(1_000.5);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.timestamp_subsec_nanos(), 500_000);
    }

    #[test]
    fn out_of_range_has_no_datetime() {
        assert_eq!(Timestamp::from_millis_f64(f64::NAN).to_datetime(), None);
        assert_eq!(Timestamp::from_millis_f64(1e16).to_datetime(), None);
        assert_eq!(Timestamp::from_millis_f64(-1e16).to_datetime(), None);
    }

    #[test]
    fn cursor_text_roundtrips_exactly() {
        let ts = Timestamp::from_julian(JulianDate::REFERENCE_NEW_MOON + Days::new(7.382_647));
        let text = ts.to_string();
        let back: Timestamp = text.parse().unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn cursor_text_rejects_garbage() {
        assert!("not-a-number".parse::<Timestamp>().is_err());
        assert_eq!(" 42 ".parse::<Timestamp>().unwrap(), Timestamp::from_millis(42));
    }

    #[test]
    fn arithmetic_with_milliseconds() {
        let ts = Timestamp::from_millis(10_000);
        assert_eq!(ts + Milliseconds::new(500.0), Timestamp::from_millis(10_500));
        assert_eq!(ts - Milliseconds::new(500.0), Timestamp::from_millis(9_500));
        assert_eq!(Timestamp::from_millis(10_500) - ts, Milliseconds::new(500.0));
        assert_eq!(ts.add_duration(Milliseconds::new(1.0)), Timestamp::from_millis(10_001));
    }

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = FixedClock(Timestamp::from_millis(7));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), Timestamp::from_millis(7));
    }
}
