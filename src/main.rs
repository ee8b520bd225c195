//! Command-line head unit.
//!
//! Plays a fixed walk through the app against an in-process engine and
//! prints every template the head unit would show.
//!
//! ```text
//! tankfuel-auto --variant carmate --fixture replies.json --settle-ms 50
//! ```

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tankfuel_auto::screen::ScreenEvent;
use tankfuel_auto::{initialize, observability, ui, CarSession, Config};

/// Steps of the walk: nearby stations and a navigation, average prices, then
/// the refuelings history with one detail and the add-refueling flow.
const WALK: &[(&str, ScreenEvent)] = &[
    ("open nearby stations", ScreenEvent::Select(0)),
    ("open first station", ScreenEvent::Select(0)),
    ("navigate", ScreenEvent::Navigate),
    ("back to stations", ScreenEvent::Back),
    ("back to menu", ScreenEvent::Back),
    ("open average prices", ScreenEvent::Select(1)),
    ("back to menu", ScreenEvent::Back),
    ("open refuelings", ScreenEvent::Select(2)),
    ("open latest refueling", ScreenEvent::Select(0)),
    ("back to refuelings", ScreenEvent::Back),
    ("add refueling", ScreenEvent::AddRefueling),
    ("pick first vehicle", ScreenEvent::Select(0)),
    ("got it", ScreenEvent::Back),
    ("back to refuelings", ScreenEvent::Back),
    ("back to menu", ScreenEvent::Back),
];

#[derive(Parser, Debug)]
#[command(name = "tankfuel-auto")]
#[command(about = "Plays a scripted head-unit walk through the in-vehicle app")]
struct Args {
    /// App variant: tankfuel or carmate
    #[arg(long)]
    variant: Option<String>,

    /// Engine id in the registry
    #[arg(long)]
    engine_id: Option<String>,

    /// Method channel name (defaults per variant)
    #[arg(long)]
    channel_name: Option<String>,

    /// JSON file of engine replies (default: built-in sample)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// TOML file of per-operation fallback policies
    #[arg(long)]
    bridge_config: Option<PathBuf>,

    /// Log filter; RUST_LOG wins when set
    #[arg(long)]
    trace_level: Option<String>,

    /// Export spans to this JSON-lines file
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Quiet period awaited after each step, in milliseconds
    #[arg(long, default_value_t = 200)]
    settle_ms: u64,
}

impl Args {
    /// Host-style option map understood by [`Config::from_host_map`].
    fn host_map(&self) -> BTreeMap<String, String> {
        let paths = [
            ("fixture", &self.fixture),
            ("bridge_config", &self.bridge_config),
            ("trace_file", &self.trace_file),
        ];
        let texts = [
            ("variant", &self.variant),
            ("engine_id", &self.engine_id),
            ("channel_name", &self.channel_name),
            ("trace_level", &self.trace_level),
        ];

        let mut options = BTreeMap::new();
        for (key, path) in paths {
            if let Some(path) = path {
                options.insert(key.to_string(), path.display().to_string());
            }
        }
        for (key, text) in texts {
            if let Some(text) = text {
                options.insert(key.to_string(), text.clone());
            }
        }
        options
    }
}

fn show(session: &CarSession, label: &str) {
    println!("── {label} (depth {})", session.depth());
    match session.render() {
        Some(template) => println!("{}", ui::render(&template)),
        None => println!("(nothing on screen)\n"),
    }
}

fn main() {
    let args = Args::parse();
    let config = Config::from_host_map(&args.host_map());
    observability::init_tracing(&config);

    let settle = Duration::from_millis(args.settle_ms);

    let span = tracing::info_span!("head_unit", variant = config.variant.title());
    let _guard = span.entered();
    tracing::info!(channel = %config.channel_name, "starting session");

    let mut session = initialize(&config);
    show(&session, "start");

    for (label, event) in WALK {
        tracing::debug!(step = %label, "dispatching");
        session.dispatch(*event);
        let tasks = session.settle(settle);
        tracing::debug!(step = %label, tasks, "settled");
        show(&session, label);
    }

    tracing::info!("walk finished");
}
