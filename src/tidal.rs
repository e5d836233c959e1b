// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Tide predictions from NOAA CO-OPS.
//!
//! Fetching is delegated to a [`TideSource`]; this module only builds the
//! query, interprets the `hilo` prediction format, caches results per query
//! in a caller-owned [`PredictionCache`], and clips them to a window around
//! the current time.

use chrono::{Duration, NaiveDateTime, Utc};
use qtty::{Hours, Millisecond};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::error::{Result, SolunarError};
use super::period::Window;
use super::timeline::{
    ChangeEmitter, ChangeEvent, Timeline, TimelineItem, TimelineProvider, TimelineRequest,
};
use super::timestamp::{Clock, SystemClock, Timestamp};

pub const TIDAL_TIMELINE_ID: &str = "solunar-timeline.tidal-timeline";

const NOAA_DATAGETTER: &str = "https://tidesandcurrents.noaa.gov/api/datagetter";

// ═══════════════════════════════════════════════════════════════════════════
// Predictions
// ═══════════════════════════════════════════════════════════════════════════

/// High or low water.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TideKind {
    #[serde(rename = "H")]
    High,
    #[serde(rename = "L")]
    Low,
}

impl TideKind {
    pub const fn code(&self) -> &'static str {
        match self {
            TideKind::High => "H",
            TideKind::Low => "L",
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One predicted high or low water.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidePrediction {
    pub timestamp: Timestamp,
    /// Height above MLLW, in feet.
    pub height_ft: f64,
    pub kind: TideKind,
}

#[derive(Deserialize)]
struct RawBody {
    predictions: Option<Vec<RawPrediction>>,
    error: Option<RawError>,
}

#[derive(Deserialize)]
struct RawPrediction {
    t: String,
    v: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RawError {
    message: String,
}

impl RawPrediction {
    fn parse(self) -> Result<TidePrediction> {
        let time = NaiveDateTime::parse_from_str(&self.t, "%Y-%m-%d %H:%M").map_err(|_| {
            SolunarError::InvalidPrediction {
                field: "t",
                value: self.t.clone(),
            }
        })?;
        let height_ft = self
            .v
            .trim()
            .parse::<f64>()
            .map_err(|_| SolunarError::InvalidPrediction {
                field: "v",
                value: self.v.clone(),
            })?;
        let kind = match self.kind.as_str() {
            "H" => TideKind::High,
            "L" => TideKind::Low,
            _ => {
                return Err(SolunarError::InvalidPrediction {
                    field: "type",
                    value: self.kind.clone(),
                })
            }
        };
        Ok(TidePrediction {
            timestamp: Timestamp::from_datetime(time.and_utc()),
            height_ft,
            kind,
        })
    }
}

/// Parse a NOAA `datagetter` JSON body (`interval=hilo`, `time_zone=GMT`).
pub fn parse_predictions(body: &str) -> Result<Vec<TidePrediction>> {
    let raw: RawBody = serde_json::from_str(body)?;
    if let Some(error) = raw.error {
        return Err(SolunarError::Noaa(error.message));
    }
    raw.predictions
        .unwrap_or_default()
        .into_iter()
        .map(RawPrediction::parse)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Query
// ═══════════════════════════════════════════════════════════════════════════

/// Prediction request for one station over a range of UTC dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoaaQuery {
    pub station: String,
    /// `YYYYMMDD`
    pub begin_date: String,
    /// `YYYYMMDD`
    pub end_date: String,
}

impl NoaaQuery {
    /// The day before through the day after `now`.
    pub fn around(station: impl Into<String>, now: Timestamp) -> Self {
        let now = now.to_datetime().unwrap_or_else(Utc::now);
        Self {
            station: station.into(),
            begin_date: (now - Duration::days(1)).format("%Y%m%d").to_string(),
            end_date: (now + Duration::days(1)).format("%Y%m%d").to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{NOAA_DATAGETTER}?product=predictions&application=NOS.COOPS.TAC.WL\
             &begin_date={}&end_date={}&datum=MLLW&station={}&time_zone=GMT\
             &units=english&interval=hilo&format=json",
            self.begin_date, self.end_date, self.station
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Source and cache
// ═══════════════════════════════════════════════════════════════════════════

/// Something that can answer a [`NoaaQuery`].
pub trait TideSource: Send {
    fn fetch(&self, query: &NoaaQuery) -> Result<Vec<TidePrediction>>;
}

/// Reads saved `datagetter` responses from `<dir>/<station>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TideSource for JsonFileSource {
    fn fetch(&self, query: &NoaaQuery) -> Result<Vec<TidePrediction>> {
        let path = self.dir.join(format!("{}.json", query.station));
        let body = std::fs::read_to_string(&path).map_err(|source| SolunarError::Io {
            path: path.clone(),
            source,
        })?;
        parse_predictions(&body)
    }
}

/// Predictions already fetched, keyed by query.
///
/// At most one query per station is kept: storing a newer query for a
/// station drops the older date ranges.
#[derive(Debug, Default, Clone)]
pub struct PredictionCache {
    entries: HashMap<NoaaQuery, Vec<TidePrediction>>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &NoaaQuery) -> Option<&[TidePrediction]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn store(&mut self, query: &NoaaQuery, predictions: Vec<TidePrediction>) {
        self.entries.retain(|cached, _| cached.station != query.station);
        self.entries.insert(query.clone(), predictions);
    }
}

/// Answer `query` from `cache`, falling back to `source` on a miss.
///
/// Failed fetches are not cached.
pub fn fetch_predictions(
    source: &dyn TideSource,
    cache: &mut PredictionCache,
    query: &NoaaQuery,
) -> Result<Vec<TidePrediction>> {
    if let Some(hit) = cache.get(query) {
        debug!(station = %query.station, "tide cache hit");
        return Ok(hit.to_vec());
    }
    let predictions = source.fetch(query)?;
    info!(
        station = %query.station,
        url = %query.url(),
        count = predictions.len(),
        "fetched tide predictions"
    );
    cache.store(query, predictions.clone());
    Ok(predictions)
}

// ═══════════════════════════════════════════════════════════════════════════
// Provider
// ═══════════════════════════════════════════════════════════════════════════

/// Tide provider for a single station.
pub struct TidalTimeline {
    station: String,
    before: Hours,
    after: Hours,
    source: Box<dyn TideSource>,
    cache: PredictionCache,
    clock: Box<dyn Clock>,
    changes: ChangeEmitter,
}

impl TidalTimeline {
    pub fn new(station: impl Into<String>, source: impl TideSource + 'static) -> Self {
        Self::with_clock(station, source, SystemClock)
    }

    pub fn with_clock(
        station: impl Into<String>,
        source: impl TideSource + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            station: station.into(),
            before: Hours::new(6.0),
            after: Hours::new(18.0),
            source: Box::new(source),
            cache: PredictionCache::new(),
            clock: Box::new(clock),
            changes: ChangeEmitter::new(),
        }
    }

    /// Override the visible window around now (default 6 h back, 18 h ahead).
    pub fn with_window(mut self, before: Hours, after: Hours) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    /// Switch station; listeners are told to refresh if it changed.
    pub fn set_station(&mut self, station: impl Into<String>) {
        let station = station.into();
        if station != self.station {
            self.station = station;
            self.changes.fire(&ChangeEvent {
                provider: TIDAL_TIMELINE_ID.to_string(),
                reset: true,
            });
        }
    }

    pub fn changes(&self) -> &ChangeEmitter {
        &self.changes
    }

    pub fn cache(&self) -> &PredictionCache {
        &self.cache
    }
}

/// Height with one decimal and a feet mark, e.g. `5.4'`.
fn height_label(height_ft: f64) -> String {
    format!("{height_ft:.1}'")
}

impl TimelineProvider for TidalTimeline {
    fn id(&self) -> &str {
        TIDAL_TIMELINE_ID
    }

    fn label(&self) -> &str {
        "Tidal Timeline"
    }

    fn provide(&mut self, _request: &TimelineRequest) -> Result<Timeline> {
        if self.station.is_empty() {
            warn!("NOAA station undefined; set `tidal.station` to a NOAA station ID");
            return Ok(Timeline::default());
        }

        let now = self.clock.now();
        let query = NoaaQuery::around(&self.station, now);
        let predictions = fetch_predictions(self.source.as_ref(), &mut self.cache, &query)?;
        let window = Window::around(
            now,
            self.before.to::<Millisecond>(),
            self.after.to::<Millisecond>(),
        );

        let items: Vec<TimelineItem> = predictions
            .iter()
            .filter(|p| window.contains_open(&p.timestamp))
            .map(|p| {
                let mut item = TimelineItem::new(p.timestamp, p.kind.code());
                item.description = Some(height_label(p.height_ft));
                item
            })
            .collect();
        debug!(station = %self.station, window = %window, shown = items.len(), "tide page");

        Ok(Timeline {
            items,
            cursor: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::FixedClock;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const BODY: &str = r#"{"predictions":[
        {"t":"2024-03-01 04:18","v":"5.432","type":"H"},
        {"t":"2024-03-01 10:41","v":"-0.127","type":"L"}
    ]}"#;

    #[test]
    fn parses_hilo_predictions() {
        let predictions = parse_predictions(BODY).unwrap();
        assert_eq!(predictions.len(), 2);
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 4, 18, 0).unwrap();
        assert_eq!(predictions[0].timestamp, Timestamp::from_datetime(expected));
        assert_eq!(predictions[0].kind, TideKind::High);
        assert!((predictions[0].height_ft - 5.432).abs() < 1e-12);
        assert_eq!(predictions[1].kind, TideKind::Low);
    }

    #[test]
    fn noaa_error_body() {
        let err = parse_predictions(r#"{"error":{"message":"No Predictions data was found."}}"#)
            .unwrap_err();
        assert!(matches!(err, SolunarError::Noaa(ref m) if m.starts_with("No Predictions")));
    }

    #[test]
    fn rejects_bad_fields() {
        let bad_type = r#"{"predictions":[{"t":"2024-03-01 04:18","v":"1.0","type":"X"}]}"#;
        assert!(matches!(
            parse_predictions(bad_type),
            Err(SolunarError::InvalidPrediction { field: "type", .. })
        ));
        let bad_time = r#"{"predictions":[{"t":"yesterday","v":"1.0","type":"H"}]}"#;
        assert!(matches!(
            parse_predictions(bad_time),
            Err(SolunarError::InvalidPrediction { field: "t", .. })
        ));
        let bad_height = r#"{"predictions":[{"t":"2024-03-01 04:18","v":"","type":"H"}]}"#;
        assert!(matches!(
            parse_predictions(bad_height),
            Err(SolunarError::InvalidPrediction { field: "v", .. })
        ));
        assert!(matches!(parse_predictions("nope"), Err(SolunarError::Json(_))));
    }

    #[test]
    fn query_spans_neighbouring_days() {
        let now = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap());
        let query = NoaaQuery::around("9414290", now);
        assert_eq!(query.begin_date, "20240229");
        assert_eq!(query.end_date, "20240302");
        let url = query.url();
        assert!(url.starts_with(NOAA_DATAGETTER));
        assert!(url.contains("?product=predictions&"));
        assert!(url.contains("&begin_date=20240229&end_date=20240302&"));
        assert!(url.contains("&station=9414290&"));
        assert!(url.ends_with("&interval=hilo&format=json"));
    }

    #[test]
    fn height_label_rounds_to_tenths() {
        assert_eq!(height_label(5.432), "5.4'");
        assert_eq!(height_label(-0.127), "-0.1'");
    }

    #[test]
    fn tide_kind_codes() {
        assert_eq!(TideKind::High.to_string(), "H");
        assert_eq!(TideKind::Low.code(), "L");
    }

    struct StubSource {
        fetches: Arc<AtomicUsize>,
    }

    impl TideSource for StubSource {
        fn fetch(&self, _query: &NoaaQuery) -> Result<Vec<TidePrediction>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TidePrediction {
                timestamp: Timestamp::EPOCH,
                height_ft: 1.0,
                kind: TideKind::High,
            }])
        }
    }

    fn stub() -> (StubSource, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            fetches: Arc::clone(&fetches),
        };
        (source, fetches)
    }

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn empty_station_skips_the_source() {
        let (source, fetches) = stub();
        let mut tides = TidalTimeline::with_clock("", source, FixedClock(at(2024, 3, 1)));
        let page = tides.provide(&TimelineRequest::default()).unwrap();
        assert_eq!(page, Timeline::default());
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert!(tides.cache().is_empty());
    }

    #[test]
    fn set_station_notifies_only_on_change() {
        let (source, _) = stub();
        let mut tides = TidalTimeline::with_clock("9414290", source, FixedClock(at(2024, 3, 1)));
        let events = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let events = Arc::clone(&events);
            tides
                .changes()
                .subscribe(move |e| events.lock().unwrap().push(e.clone()))
        };

        tides.set_station("9414290");
        assert!(events.lock().unwrap().is_empty());

        tides.set_station("8443970");
        assert_eq!(tides.station(), "8443970");
        let seen = events.lock().unwrap().clone();
        assert_eq!(
            seen,
            [ChangeEvent {
                provider: TIDAL_TIMELINE_ID.to_string(),
                reset: true,
            }]
        );
    }

    #[test]
    fn cache_keeps_latest_query_per_station() {
        let (source, fetches) = stub();
        let mut cache = PredictionCache::new();
        for day in 1..=5 {
            let query = NoaaQuery::around("9414290", at(2024, 3, day));
            fetch_predictions(&source, &mut cache, &query).unwrap();
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 5);
        assert_eq!(cache.len(), 1);
        let latest = NoaaQuery::around("9414290", at(2024, 3, 5));
        assert!(cache.get(&latest).is_some());

        let other = NoaaQuery::around("8443970", at(2024, 3, 5));
        fetch_predictions(&source, &mut cache, &other).unwrap();
        assert_eq!(cache.len(), 2);
        fetch_predictions(&source, &mut cache, &latest).unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 6);
    }
}
