// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Paged lunar phase timeline.
//!
//! The first page (no cursor) shows the next lunation's worth of upcoming
//! phases followed by past ones, newest first.  Every later page continues
//! into the past from the cursor, which is the timestamp of the oldest item
//! of the previous page.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{Result, SolunarError};
use super::lunar::{generate_events, Direction, Granularity, LunarEvent};
use super::timeline::{
    Accessibility, Limit, Timeline, TimelineItem, TimelineProvider, TimelineRequest,
};
use super::timestamp::{Clock, SystemClock, Timestamp};

pub const LUNAR_TIMELINE_ID: &str = "solunar-timeline.lunar-timeline";

/// Lunar phase provider.
pub struct LunarTimeline {
    media_dir: PathBuf,
    granularity: Granularity,
    clock: Box<dyn Clock>,
}

impl LunarTimeline {
    pub fn new(media_dir: impl Into<PathBuf>, granularity: Granularity) -> Self {
        Self::with_clock(media_dir, granularity, SystemClock)
    }

    pub fn with_clock(
        media_dir: impl Into<PathBuf>,
        granularity: Granularity,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            media_dir: media_dir.into(),
            granularity,
            clock: Box::new(clock),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Events for one page, newest first.
    ///
    /// Without a cursor: up to one lunation of future events, then past
    /// events continuing directly below the oldest future one.  With a
    /// cursor: `limit` past events strictly before it.
    pub fn page_events(&self, cursor: Option<Timestamp>, limit: usize) -> Vec<LunarEvent> {
        match cursor {
            Some(cursor) => generate_events(limit, cursor, Direction::Past, self.granularity),
            None => {
                let now = self.clock.now();
                let ahead = limit.min(self.granularity.steps() as usize);
                let mut events = generate_events(ahead, now, Direction::Future, self.granularity);
                events.reverse();
                // Anchor on the oldest future event so the seam has no gap
                // even when `now` sits exactly on a boundary.
                let anchor = events.last().map_or(now, |e| e.timestamp);
                events.extend(generate_events(
                    limit - ahead,
                    anchor,
                    Direction::Past,
                    self.granularity,
                ));
                events
            }
        }
    }

    fn to_item(&self, event: &LunarEvent) -> TimelineItem {
        let label = event.phase.label();
        TimelineItem {
            timestamp: event.timestamp,
            label: String::new(),
            detail: Some(label.to_string()),
            description: event.timestamp.to_datetime().map(short_date),
            icon_path: Some(icon_path(&self.media_dir, event.phase.icon())),
            context_value: Some(event.phase.context_value()),
            accessibility: Some(Accessibility {
                label: label.to_string(),
                role: None,
            }),
        }
    }
}

/// Weekday, month and day without the year, e.g. `"Thu Jan 06"`.
fn short_date(datetime: DateTime<Utc>) -> String {
    datetime.format("%a %b %d").to_string()
}

pub(crate) fn icon_path(media_dir: &Path, file: &str) -> PathBuf {
    media_dir.join(file)
}

fn decode_cursor(cursor: &str) -> Result<Timestamp> {
    cursor
        .parse::<Timestamp>()
        .ok()
        .filter(|ts| ts.millis().is_finite())
        .ok_or_else(|| SolunarError::InvalidCursor {
            cursor: cursor.to_string(),
        })
}

impl TimelineProvider for LunarTimeline {
    fn id(&self) -> &str {
        LUNAR_TIMELINE_ID
    }

    fn label(&self) -> &str {
        "Lunar Timeline"
    }

    fn provide(&mut self, request: &TimelineRequest) -> Result<Timeline> {
        let limit = match &request.limit {
            None | Some(Limit::Count(0)) => return Err(SolunarError::MissingLimit),
            Some(Limit::Count(count)) => *count,
            Some(Limit::Until { timestamp, .. }) => {
                return Err(SolunarError::UnsupportedLimit(format!(
                    "until {timestamp}"
                )))
            }
        };
        let cursor = request.cursor.as_deref().map(decode_cursor).transpose()?;

        let events = self.page_events(cursor, limit);
        debug!(
            limit,
            cursor = ?cursor,
            granularity = %self.granularity,
            produced = events.len(),
            "lunar page"
        );

        Ok(Timeline {
            cursor: events.last().map(|e| e.timestamp.to_string()),
            items: events.iter().map(|e| self.to_item(e)).collect(),
        })
    }
}
