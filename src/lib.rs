// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solunar timelines
//!
//! Data providers for an editor's timeline view: lunar phases, NOAA tide
//! predictions and a "today" marker.  The host renders; this crate produces
//! pages of [`TimelineItem`]s through the [`TimelineProvider`] contract.
//!
//! # Core types
//!
//! - [`Timestamp`]: milliseconds since the Unix epoch.
//! - [`Time<S>`]: generic instant parameterised by a [`TimeScale`] marker.
//! - [`JulianDate`]: type alias for `Time<JD>`.
//! - [`Window`]: an [`Interval`] of timestamps used to clip tide predictions.
//! - [`PhaseValue`]: continuous lunation count since the reference new moon.
//! - [`LunarEvent`]: a named [`Phase`] and the instant it occurs.
//!
//! # Lunar phases
//!
//! [`generate_events`] walks phase boundaries forwards or backwards from a
//! timestamp.  It is pure arithmetic and never fails:
//!
//! ```rust
//! use solunar::{generate_events, Direction, Granularity, JulianDate, Phase, Timestamp};
//!
//! let new_moon = Timestamp::from_julian(JulianDate::REFERENCE_NEW_MOON);
//! let next = generate_events(1, new_moon, Direction::Future, Granularity::Halves);
//! assert_eq!(next[0].phase, Phase::Full);
//! ```
//!
//! # Providers
//!
//! | Provider | Source |
//! |----------|--------|
//! | [`LunarTimeline`] | [`generate_events`], paged by cursor |
//! | [`TidalTimeline`] | a [`TideSource`] through a [`PredictionCache`] |
//! | [`TodayTimeline`] | the clock, refreshed by a [`RefreshTimer`] |

mod config;
mod error;
pub(crate) mod instant;
mod julian_date_ext;
mod lunar;
mod lunar_timeline;
mod period;
pub(crate) mod scales;
mod tidal;
mod timeline;
mod timestamp;
mod today;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use config::{LunarConfig, SolunarConfig, TidalConfig, TodayConfig};
pub use error::{Result, SolunarError};
pub use instant::{Time, TimeInstant, TimeScale};
pub use lunar::{
    generate_events, phase_to_timestamp, timestamp_to_phase, Direction, Granularity, LunarEvent,
    Phase, PhaseValue,
};
pub use lunar_timeline::{LunarTimeline, LUNAR_TIMELINE_ID};
pub use period::{Interval, Window};
pub use scales::{UnixTime, JD};
pub use tidal::{
    fetch_predictions, parse_predictions, JsonFileSource, NoaaQuery, PredictionCache,
    TidalTimeline, TideKind, TidePrediction, TideSource, TIDAL_TIMELINE_ID,
};
pub use timeline::{
    Accessibility, ChangeEmitter, ChangeEvent, Limit, Subscription, Timeline, TimelineItem,
    TimelineProvider, TimelineRequest,
};
pub use timestamp::{Clock, FixedClock, SystemClock, Timestamp, MS_PER_DAY};
pub use today::{RefreshTimer, TodayTimeline, TODAY_TIMELINE_ID};

/// Julian Date: continuous count of days since the Julian Period.
///
/// This is a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;
