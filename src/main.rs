// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

mod cli;
mod logging;

use std::process;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use solunar::{
    FixedClock, Granularity, JsonFileSource, LunarTimeline, SolunarConfig, SystemClock,
    TidalTimeline, Timeline, TimelineProvider, TimelineRequest, Timestamp, TodayTimeline,
};

use crate::cli::{Cli, Command, GranularityArg, LunarArgs, TidesArgs, TodayArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SolunarConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => SolunarConfig::default(),
    };

    match cli.command {
        Command::Lunar(args) => lunar(&config, args, cli.json),
        Command::Tides(args) => tides(&config, args, cli.json),
        Command::Today(args) => today(&config, args, cli.json),
    }
}

fn lunar(config: &SolunarConfig, args: LunarArgs, json: bool) -> Result<()> {
    let granularity = match args.granularity {
        Some(GranularityArg::Halves) => Granularity::Halves,
        Some(GranularityArg::Quarters) => Granularity::Quarters,
        None => config.lunar.granularity,
    };
    let mut provider = match args.at {
        Some(at) => LunarTimeline::with_clock(
            &config.media_dir,
            granularity,
            FixedClock(Timestamp::from_datetime(at)),
        ),
        None => LunarTimeline::with_clock(&config.media_dir, granularity, SystemClock),
    };
    let request = match args.cursor {
        Some(cursor) => TimelineRequest::after(cursor, args.limit),
        None => TimelineRequest::first(args.limit),
    };
    let page = provider.provide(&request).context("lunar page")?;
    print_page(&page, json)
}

fn tides(config: &SolunarConfig, args: TidesArgs, json: bool) -> Result<()> {
    let station = args.station.unwrap_or_else(|| config.tidal.station.clone());
    let data_dir = args.data_dir.unwrap_or_else(|| config.tidal.data_dir.clone());
    let source = JsonFileSource::new(&data_dir);
    let now = args.at.map(Timestamp::from_datetime).unwrap_or_else(Timestamp::now);

    let mut provider = TidalTimeline::with_clock(station, source, FixedClock(now))
        .with_window(config.tidal.window_before(), config.tidal.window_after());
    info!(station = provider.station(), data_dir = %data_dir.display(), "tides");
    let page = provider
        .provide(&TimelineRequest::default())
        .context("tide page")?;
    print_page(&page, json)
}

fn today(config: &SolunarConfig, args: TodayArgs, json: bool) -> Result<()> {
    let mut provider = TodayTimeline::new(&config.media_dir).with_lead(config.today.lead());
    print_page(&provider.provide(&TimelineRequest::default())?, json)?;
    if args.watch == 0 {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let _subscription = provider.changes().subscribe(move |_| {
        let _ = tx.send(());
    });
    provider.start_refresh(config.today.refresh_interval());
    for _ in 0..args.watch {
        rx.recv().context("refresh timer stopped")?;
        print_page(&provider.provide(&TimelineRequest::default())?, json)?;
    }
    provider.stop_refresh();
    Ok(())
}

fn print_page(page: &Timeline, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }
    for item in &page.items {
        let when = item
            .timestamp
            .to_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| item.timestamp.to_string());
        let text = [item.label.as_str(), item.detail.as_deref().unwrap_or_default()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{when}  {text:<14} {}",
            item.description.as_deref().unwrap_or_default()
        );
    }
    if let Some(cursor) = &page.cursor {
        println!("cursor: {cursor}");
    }
    Ok(())
}
