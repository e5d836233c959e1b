// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Lunar phase events
//!
//! A mean-moon model: the phase advances linearly from the reference new
//! moon of JD 2 451 550.1 at one cycle per synodic month
//! (29.530 588 853 days).
//!
//! ```text
//! julian = millis / 86 400 000 + 2 440 587.5
//! phase  = (julian − 2 451 550.1) / 29.530 588 853
//! ```
//!
//! The integer part of a [`PhaseValue`] counts lunations, the fractional
//! part is the position inside the current one.  Phase boundaries sit on
//! multiples of `1/g`, where `g` is the [`Granularity`]: 2 for new/full
//! moons only, 4 when the quarters are included.
//!
//! ## Quick Example
//! ```rust
//! use solunar::{generate_events, Direction, Granularity, Timestamp};
//!
//! let start = Timestamp::from_millis(1_700_000_000_000);
//! let next = generate_events(4, start, Direction::Future, Granularity::Quarters);
//! assert_eq!(next.len(), 4);
//! assert!(next.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp::Timestamp;
use super::JulianDate;

/// Corrections applied to a boundary index estimated in phase space before
/// it is settled in timestamp space.
const MAX_NUDGES: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════
// Phase value
// ═══════════════════════════════════════════════════════════════════════════

/// Continuous count of synodic months since the reference new moon.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseValue(f64);

impl PhaseValue {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Whole lunations elapsed (may be negative).
    #[inline]
    pub fn cycle(&self) -> f64 {
        self.0.floor()
    }

    /// Position within the current lunation, in `[0, 1)`.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 - self.0.floor()
    }
}

impl fmt::Display for PhaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lunations", self.0)
    }
}

/// Continuous phase at `timestamp`.
#[inline]
pub fn timestamp_to_phase(timestamp: Timestamp) -> PhaseValue {
    PhaseValue(timestamp.to_julian().lunations())
}

/// Instant at which the continuous phase equals `phase`.
#[inline]
pub fn phase_to_timestamp(phase: PhaseValue) -> Timestamp {
    Timestamp::from_julian(JulianDate::from_lunations(phase.0))
}

// ═══════════════════════════════════════════════════════════════════════════
// Phase categories
// ═══════════════════════════════════════════════════════════════════════════

/// Named lunar phase, ordered by increasing offset inside a lunation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    New,
    FirstQuarter,
    Full,
    ThirdQuarter,
}

impl Phase {
    /// Human readable name, e.g. `"Full Moon"`.
    pub const fn label(&self) -> &'static str {
        match self {
            Phase::New => "New Moon",
            Phase::FirstQuarter => "First Quarter",
            Phase::Full => "Full Moon",
            Phase::ThirdQuarter => "Third Quarter",
        }
    }

    /// Icon file name inside the media directory.
    pub const fn icon(&self) -> &'static str {
        match self {
            Phase::New => "New.svg",
            Phase::FirstQuarter => "FirstQuarter.svg",
            Phase::Full => "Full.svg",
            Phase::ThirdQuarter => "ThirdQuarter.svg",
        }
    }

    /// Kebab-case identifier, e.g. `"first-quarter"`.
    pub fn context_value(&self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// How many phase boundaries a lunation is split into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// New and full moons (`g = 2`).
    Halves,
    /// New, first quarter, full and third quarter (`g = 4`).
    #[default]
    Quarters,
}

impl Granularity {
    /// Boundaries per lunation.
    #[inline]
    pub const fn steps(&self) -> u32 {
        match self {
            Granularity::Halves => 2,
            Granularity::Quarters => 4,
        }
    }

    /// Phase found `offset` boundaries into a lunation.
    fn phase_at(&self, offset: u32) -> Phase {
        match (self, offset) {
            (_, 0) => Phase::New,
            (Granularity::Halves, _) => Phase::Full,
            (Granularity::Quarters, 1) => Phase::FirstQuarter,
            (Granularity::Quarters, 2) => Phase::Full,
            (Granularity::Quarters, _) => Phase::ThirdQuarter,
        }
    }

    /// Nearest named phase to a continuous phase value.
    pub fn classify(&self, phase: PhaseValue) -> Phase {
        let g = self.steps();
        let offset = (phase.fraction() * g as f64).round() as u32 % g;
        self.phase_at(offset)
    }

    /// Length of one boundary step.
    pub fn step(&self) -> qtty::Days {
        JulianDate::SYNODIC_MONTH / self.steps() as f64
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Halves => f.write_str("halves"),
            Granularity::Quarters => f.write_str("quarters"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Event generation
// ═══════════════════════════════════════════════════════════════════════════

/// Direction of travel along the time axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Future,
    Past,
}

impl Direction {
    #[inline]
    const fn sign(&self) -> f64 {
        match self {
            Direction::Future => 1.0,
            Direction::Past => -1.0,
        }
    }
}

/// The instant a named phase occurs.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarEvent {
    pub phase: Phase,
    pub timestamp: Timestamp,
}

/// Instant of boundary number `index` (`index / g` lunations).
fn boundary_time(index: f64, g: f64) -> Timestamp {
    phase_to_timestamp(PhaseValue(index / g))
}

/// Index of the first boundary strictly after (`Future`) or strictly
/// before (`Past`) `start`.
///
/// The estimate from the phase is only a starting point: the comparison is
/// made on the boundary instants themselves, so a boundary a fraction of a
/// millisecond away is still reported, and a start that is itself a
/// generated boundary is never reported again, whatever the magnitude.
fn first_boundary(start: Timestamp, g: f64, direction: Direction) -> f64 {
    let scaled = timestamp_to_phase(start).value() * g;
    let mut index = match direction {
        Direction::Future => scaled.ceil(),
        Direction::Past => scaled.floor(),
    };
    for _ in 0..MAX_NUDGES {
        let (this, previous) = (
            boundary_time(index, g),
            boundary_time(index - direction.sign(), g),
        );
        let (reached, overshot) = match direction {
            Direction::Future => (this <= start, previous > start),
            Direction::Past => (this >= start, previous < start),
        };
        if reached {
            index += direction.sign();
        } else if overshot {
            index -= direction.sign();
        } else {
            break;
        }
    }
    index
}

/// Generates `count` consecutive phase events starting from the first
/// boundary strictly after (`Future`) or strictly before (`Past`) `start`.
///
/// Future output is in increasing time order, past output in decreasing
/// order.  Consecutive events are exactly one [`Granularity::step`] apart.
/// An event never lands on `start` itself, so a future and a past run from
/// the same instant never share an event.
pub fn generate_events(
    count: usize,
    start: Timestamp,
    direction: Direction,
    granularity: Granularity,
) -> Vec<LunarEvent> {
    let g = granularity.steps() as f64;
    let first = first_boundary(start, g, direction);

    (0..count)
        .map(|i| {
            let phase = PhaseValue((first + direction.sign() * i as f64) / g);
            LunarEvent {
                phase: granularity.classify(phase),
                timestamp: phase_to_timestamp(phase),
            }
        })
        .collect()
}
