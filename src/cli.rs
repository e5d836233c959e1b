// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

/// Solunar timelines on the command line.
#[derive(Parser)]
#[command(
    name = "solunar",
    version,
    about = "Lunar phases, tide predictions and a today marker as timeline pages"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print pages as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Page through lunar phase events.
    Lunar(LunarArgs),
    /// Show tide predictions around now.
    Tides(TidesArgs),
    /// Show the today marker.
    Today(TodayArgs),
}

/// Phase granularity as accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Halves,
    Quarters,
}

/// Arguments for the `lunar` subcommand.
#[derive(clap::Args)]
pub struct LunarArgs {
    /// Number of events in the page.
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Cursor from a previous page.
    #[arg(long)]
    pub cursor: Option<String>,

    /// Use this instant instead of now (RFC 3339).
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Override the configured granularity.
    #[arg(short, long, value_enum)]
    pub granularity: Option<GranularityArg>,
}

/// Arguments for the `tides` subcommand.
#[derive(clap::Args)]
pub struct TidesArgs {
    /// Override the configured NOAA station id.
    #[arg(short, long)]
    pub station: Option<String>,

    /// Override the configured directory of saved predictions.
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Use this instant instead of now (RFC 3339).
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Arguments for the `today` subcommand.
#[derive(clap::Args)]
pub struct TodayArgs {
    /// Keep printing the marker on each refresh, this many times.
    #[arg(short, long, default_value_t = 0)]
    pub watch: usize,
}
