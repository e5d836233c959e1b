// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! "Today" marker.
//!
//! A single item slightly ahead of now, so the host keeps a visible marker
//! at the top of the timeline.  A [`RefreshTimer`] asks the host to
//! re-query periodically so the marker follows the clock.

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use qtty::{Millisecond, Seconds};
use tracing::{debug, trace};

use super::error::Result;
use super::lunar_timeline::icon_path;
use super::timeline::{
    ChangeEmitter, ChangeEvent, Timeline, TimelineItem, TimelineProvider, TimelineRequest,
};
use super::timestamp::{Clock, SystemClock};

pub const TODAY_TIMELINE_ID: &str = "solunar-timeline.today-timeline";

// ═══════════════════════════════════════════════════════════════════════════
// Refresh timer
// ═══════════════════════════════════════════════════════════════════════════

/// Background timer firing a [`ChangeEvent`] every `interval`.
///
/// The timer thread lives exactly as long as this value: [`RefreshTimer::stop`]
/// or dropping it ends the thread and waits for it.  A listener may stop
/// the timer that is calling it; the thread then ends without being joined.
#[derive(Debug)]
pub struct RefreshTimer {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub fn start(interval: Duration, emitter: ChangeEmitter, event: ChangeEvent) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    trace!(provider = %event.provider, "refresh tick");
                    emitter.fire(&event);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(?interval, "refresh timer started");
        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer and wait for its thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            // Stopped from a listener on the timer thread: it exits once the
            // listener returns.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
            debug!("refresh timer stopped");
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Provider
// ═══════════════════════════════════════════════════════════════════════════

/// Provider of the "Today" marker.
pub struct TodayTimeline {
    media_dir: PathBuf,
    lead: Seconds,
    clock: Box<dyn Clock>,
    changes: ChangeEmitter,
    timer: Option<RefreshTimer>,
}

impl TodayTimeline {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(media_dir, SystemClock)
    }

    pub fn with_clock(media_dir: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self {
            media_dir: media_dir.into(),
            lead: Seconds::new(10.0),
            clock: Box::new(clock),
            changes: ChangeEmitter::new(),
            timer: None,
        }
    }

    /// How far ahead of now the marker is placed (default 10 s).
    pub fn with_lead(mut self, lead: Seconds) -> Self {
        self.lead = lead;
        self
    }

    pub fn changes(&self) -> &ChangeEmitter {
        &self.changes
    }

    /// Start (or restart) periodic refresh notifications.
    pub fn start_refresh(&mut self, interval: Duration) {
        // Replacing the old timer drops it, which joins its thread.
        self.timer = Some(RefreshTimer::start(
            interval,
            self.changes.clone(),
            ChangeEvent {
                provider: TODAY_TIMELINE_ID.to_string(),
                reset: false,
            },
        ));
    }

    pub fn stop_refresh(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.timer.as_ref().is_some_and(RefreshTimer::is_running)
    }
}

impl TimelineProvider for TodayTimeline {
    fn id(&self) -> &str {
        TODAY_TIMELINE_ID
    }

    fn label(&self) -> &str {
        "Today"
    }

    fn provide(&mut self, _request: &TimelineRequest) -> Result<Timeline> {
        let at = self.clock.now() + self.lead.to::<Millisecond>();
        let mut item = TimelineItem::new(at, "");
        item.description = Some("Today".to_string());
        item.icon_path = Some(icon_path(&self.media_dir, "Empty.svg"));
        Ok(Timeline {
            items: vec![item],
            cursor: None,
        })
    }
}
