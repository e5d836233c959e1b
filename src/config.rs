// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! TOML configuration.
//!
//! ```toml
//! media_dir = "media"
//!
//! [lunar]
//! granularity = "quarters"   # or "halves"
//!
//! [tidal]
//! station = "9414290"
//! data_dir = "tides"
//! window_before_hours = 6.0
//! window_after_hours = 18.0
//!
//! [today]
//! lead_secs = 10
//! refresh_secs = 10
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use qtty::{Hours, Seconds};
use serde::Deserialize;

use super::error::{Result, SolunarError};
use super::lunar::Granularity;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolunarConfig {
    /// Directory holding the phase and marker icons.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    #[serde(default)]
    pub lunar: LunarConfig,

    #[serde(default)]
    pub tidal: TidalConfig,

    #[serde(default)]
    pub today: TodayConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LunarConfig {
    #[serde(default)]
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TidalConfig {
    /// NOAA station id; empty disables the tide timeline.
    #[serde(default)]
    pub station: String,
    /// Directory of saved `<station>.json` prediction responses.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_window_before_hours")]
    pub window_before_hours: f64,
    #[serde(default = "default_window_after_hours")]
    pub window_after_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodayConfig {
    #[serde(default = "default_ten")]
    pub lead_secs: u64,
    #[serde(default = "default_ten")]
    pub refresh_secs: u64,
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("tides")
}
fn default_window_before_hours() -> f64 {
    6.0
}
fn default_window_after_hours() -> f64 {
    18.0
}
fn default_ten() -> u64 {
    10
}

impl Default for SolunarConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            lunar: LunarConfig::default(),
            tidal: TidalConfig::default(),
            today: TodayConfig::default(),
        }
    }
}

impl Default for TidalConfig {
    fn default() -> Self {
        Self {
            station: String::new(),
            data_dir: default_data_dir(),
            window_before_hours: default_window_before_hours(),
            window_after_hours: default_window_after_hours(),
        }
    }
}

impl Default for TodayConfig {
    fn default() -> Self {
        Self {
            lead_secs: default_ten(),
            refresh_secs: default_ten(),
        }
    }
}

impl TidalConfig {
    pub fn window_before(&self) -> Hours {
        Hours::new(self.window_before_hours)
    }

    pub fn window_after(&self) -> Hours {
        Hours::new(self.window_after_hours)
    }
}

impl TodayConfig {
    pub fn lead(&self) -> Seconds {
        Seconds::new(self.lead_secs as f64)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

impl SolunarConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SolunarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SolunarConfig::from_toml_str("").unwrap();
        assert_eq!(config, SolunarConfig::default());
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert_eq!(config.lunar.granularity, Granularity::Quarters);
        assert_eq!(config.tidal.station, "");
        assert_eq!(config.tidal.window_before(), Hours::new(6.0));
        assert_eq!(config.today.refresh_interval(), Duration::from_secs(10));
    }

    #[test]
    fn full_config() {
        let config = SolunarConfig::from_toml_str(
            r#"
            media_dir = "/opt/solunar/media"

            [lunar]
            granularity = "halves"

            [tidal]
            station = "9414290"
            window_after_hours = 12.0

            [today]
            lead_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.lunar.granularity, Granularity::Halves);
        assert_eq!(config.tidal.station, "9414290");
        assert_eq!(config.tidal.window_after(), Hours::new(12.0));
        assert_eq!(config.tidal.window_before_hours, 6.0);
        assert_eq!(config.today.lead(), Seconds::new(30.0));
        assert_eq!(config.today.refresh_secs, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SolunarConfig::from_toml_str("[lunar]\nphases = 8\n").unwrap_err();
        assert!(matches!(err, SolunarError::Config(_)));
    }

    #[test]
    fn unknown_granularity_is_rejected() {
        assert!(SolunarConfig::from_toml_str("[lunar]\ngranularity = \"eighths\"\n").is_err());
    }

    #[test]
    fn missing_file() {
        let err = SolunarConfig::load(Path::new("/nonexistent/solunar.toml")).unwrap_err();
        assert!(matches!(err, SolunarError::Io { .. }));
    }
}
