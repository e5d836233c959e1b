// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale marker types.
//!
//! | Marker | Description | Epoch (JD) |
//! |--------|-------------|------------|
//! | [`JD`] | Julian Date | 0.0 |
//! | [`UnixTime`] | Days since 1970-01-01 | 2 440 587.5 |

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date, the identity scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    #[inline(always)]
    fn to_jd(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd(jd: Days) -> Days {
        jd
    }
}

/// Days since 1970-01-01T00:00:00 UTC, ignoring leap seconds.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UnixTime;

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

impl TimeScale for UnixTime {
    #[inline(always)]
    fn to_jd(value: Days) -> Days {
        value + UNIX_EPOCH_JD
    }

    #[inline(always)]
    fn from_jd(jd: Days) -> Days {
        jd - UNIX_EPOCH_JD
    }
}

#[cfg(test)]
mod tests {
    use super::super::instant::Time;
    use super::*;

    #[test]
    fn j2000_in_unix_days() {
        let jd = Time::<JD>::new(2_451_545.0);
        let unix = jd.to::<UnixTime>();
        assert!((unix.value() - 10_957.5).abs() < 1e-10);
        assert!((unix.to::<JD>().value() - jd.value()).abs() < 1e-10);
    }
}
