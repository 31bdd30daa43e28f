use anyhow::{bail, Result};
use clap::Parser;
use school_run_tracker::prelude::*;
use std::path::PathBuf;

mod output;
mod snapshot;

use output::{render_json, render_student, render_text};
use snapshot::read_snapshot;

#[derive(Parser, Debug)]
#[command(
    name = "eta-board",
    author,
    version,
    about = "Print the ETA/status board of a school bus trip",
    long_about = "Reads a JSON snapshot of one trip (trip document, students on the route, \
                  today's duration overrides and the event log) and prints every student's \
                  status in stop order, followed by the trip's progress counters."
)]
struct Args {
    /// Snapshot JSON file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Only show this student, with their timeline
    #[arg(long)]
    student: Option<String>,

    /// Print the board as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if !args.snapshot.exists() {
        bail!("Snapshot file does not exist: {}", args.snapshot.display());
    }

    let (provider, key) = read_snapshot(&args.snapshot)?.into_provider()?;
    log::info!("Trip: {}", key);

    let snapshot = RouteSnapshot::load(&provider, key);

    if let Some(student) = &args.student {
        let student_id = StudentIdentifier::new(student);
        if !snapshot.students.iter().any(|s| s.id == student_id) {
            log::warn!("{} is not on route {}", student_id, snapshot.key.route_id);
        }
        print!("{}", render_student(&snapshot, &student_id));
        return Ok(());
    }

    let board = snapshot.board();
    if args.json {
        println!("{}", render_json(&snapshot, &board)?);
    } else {
        print!("{}", render_text(&snapshot, &board));
    }

    Ok(())
}
