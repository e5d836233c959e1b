// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Host-neutral timeline contract.
//!
//! A host asks a [`TimelineProvider`] for a page of [`TimelineItem`]s with a
//! [`TimelineRequest`], and listens for "please refresh" notifications
//! through a [`ChangeEmitter`].  Rendering the items is the host's job.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::Result;
use super::timestamp::Timestamp;

// ═══════════════════════════════════════════════════════════════════════════
// Requests and pages
// ═══════════════════════════════════════════════════════════════════════════

/// How much the host wants in one page.
#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    /// A number of items.
    Count(usize),
    /// Everything newer than the given item.
    Until { timestamp: Timestamp, id: Option<String> },
}

/// A page request issued by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineRequest {
    /// Cursor returned with the previous page, `None` for the first page.
    pub cursor: Option<String>,
    pub limit: Option<Limit>,
}

impl TimelineRequest {
    /// First page of `count` items.
    pub fn first(count: usize) -> Self {
        Self {
            cursor: None,
            limit: Some(Limit::Count(count)),
        }
    }

    /// Page of `count` items following `cursor`.
    pub fn after(cursor: impl Into<String>, count: usize) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit: Some(Limit::Count(count)),
        }
    }
}

/// Accessibility information attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessibility {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One display record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub timestamp: Timestamp,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
}

impl TimelineItem {
    /// Bare item with only a timestamp and a label.
    pub fn new(timestamp: Timestamp, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            label: label.into(),
            detail: None,
            description: None,
            icon_path: None,
            context_value: None,
            accessibility: None,
        }
    }
}

/// A page of items, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub items: Vec<TimelineItem>,
    /// Cursor to request the next (older) page, if the provider pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A source of timeline items.
pub trait TimelineProvider {
    /// Stable identifier, e.g. `"solunar-timeline.lunar-timeline"`.
    fn id(&self) -> &str;

    /// Human readable name.
    fn label(&self) -> &str;

    /// Produce one page.
    fn provide(&mut self, request: &TimelineRequest) -> Result<Timeline>;
}

// ═══════════════════════════════════════════════════════════════════════════
// Change notifications
// ═══════════════════════════════════════════════════════════════════════════

/// Payload of a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Id of the provider whose items changed.
    pub provider: String,
    /// Whether the host should drop cached pages instead of merging.
    pub reset: bool,
}

type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl Listeners {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        // A listener that panicked cannot leave the list half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fan-out of [`ChangeEvent`]s to subscribed listeners.
///
/// Cloning an emitter yields a handle to the same listener set.
#[derive(Clone, Default)]
pub struct ChangeEmitter {
    listeners: Arc<Listeners>,
}

impl ChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Notify every current listener.
    pub fn fire(&self, event: &ChangeEvent) {
        // Listeners run outside the lock so they may (un)subscribe.
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl std::fmt::Debug for ChangeEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle returned by [`ChangeEmitter::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: std::sync::Weak<Listeners>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").finish_non_exhaustive()
    }
}
