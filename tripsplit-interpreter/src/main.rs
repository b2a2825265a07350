#![warn(clippy::uninlined_format_args)]

mod config;
mod render;

use std::{borrow::Cow, env, process};

use config::{InterpreterConfig, init_logging};
use render::ReportRenderer;
use tripsplit_application::{TripLedger, TripSnapshotSource};
use tripsplit_infrastructure::JsonSnapshotSource;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: tripsplit-interpreter <snapshot.json>".into());
    };

    let config = InterpreterConfig::from_env().map_err(|err| err.to_string())?;
    let snapshot = JsonSnapshotSource::new(&path)
        .load()
        .map_err(|err| err.to_string())?;

    if snapshot.participants.is_empty() {
        return Err(format!("Trip in '{path}' has no participants").into());
    }

    let ledger = TripLedger::from_snapshot(snapshot);
    tracing::info!(trip = %ledger.name(), path = %path, "Snapshot loaded");

    let report = ledger.report();
    println!("{}", ReportRenderer::new(&config).render(ledger.name(), &report));
    Ok(())
}
