//! `customs` — command-line front end for the customs-sim workspace.
//!
//! Two working modes plus a bootstrap helper:
//!
//! - `simulate` runs one 24-hour pass with the schedule as given and
//!   writes the hourly report.
//! - `optimize` runs the greedy search for the leanest schedule that
//!   keeps every hour's mean wait under the threshold, then writes both
//!   the tuned schedule and the report of its final pass.
//! - `init-db` creates an empty customs database with the expected tables.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use customs_core::{Lane, SimParams, Tick, TimeGrid, WallTriple};
use customs_engine::{Customs, SimObserver, Simulation};
use customs_opt::Optimizer;
use customs_report::{hourly_report, write_report_csv};
use customs_schedule::{load_schedule_csv, write_schedule_csv};
use customs_store::{CustomsDb, Roster, StoreOutcomeObserver};

// ── CLI surface ───────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "customs",
    version,
    about = "Discrete-event throughput simulator and staffing optimizer for an international-arrivals customs hall"
)]
struct Cli {
    /// Path to the customs SQLite database.
    #[arg(long)]
    db: PathBuf,

    /// Wall-clock seconds per simulation tick (must divide 3600).
    #[arg(long, default_value_t = 10)]
    speed_factor: u32,

    /// Hourly mean-wait ceiling, in minutes.
    #[arg(long, default_value_t = 20)]
    threshold: u32,

    /// Optimizer step size in booths.
    #[arg(long, default_value_t = 3)]
    momentum: u32,

    /// Capacity of each booth's mini-queue.
    #[arg(long, default_value_t = 1)]
    queue_capacity: usize,

    /// Seed for the roster's service-time draws.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Domestic service distribution, "LO,MODE,HI" in HH:MM:SS each.
    #[arg(long, value_parser = parse_triple)]
    domestic_service: Option<WallTriple>,

    /// Foreign service distribution, "LO,MODE,HI" in HH:MM:SS each.
    #[arg(long, value_parser = parse_triple)]
    foreign_service: Option<WallTriple>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one 24-hour simulation with the schedule as given.
    Simulate {
        /// Server-schedule CSV to apply.
        #[arg(long)]
        schedule: PathBuf,

        /// Where to write the hourly report.
        #[arg(long, default_value = "passenger_report.csv")]
        out: PathBuf,
    },

    /// Search for the leanest schedule that keeps waits under the threshold.
    Optimize {
        /// Server-schedule CSV; only its `max` ceilings matter, the hourly
        /// counts are rewritten by the search.
        #[arg(long)]
        schedule: PathBuf,

        /// Where to write the hourly report of the final pass.
        #[arg(long, default_value = "passenger_report.csv")]
        out: PathBuf,

        /// Where to write the optimized schedule.
        #[arg(long, default_value = "optimized_schedule.csv")]
        schedule_out: PathBuf,
    },

    /// Create an empty customs database with the expected tables.
    InitDb,
}

fn parse_triple(s: &str) -> Result<WallTriple, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [lo, mode, hi] => Ok(WallTriple::new(lo, mode, hi)),
        _ => Err(format!("expected \"LO,MODE,HI\", got {s:?}")),
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Wraps the store observer and logs a status line at each hour boundary.
struct HourlyProgress<'a> {
    inner: StoreOutcomeObserver<'a>,
    grid:  TimeGrid,
}

impl SimObserver for HourlyProgress<'_> {
    fn on_serviced(&mut self, now: Tick, serviced: &[customs_engine::Passenger]) {
        self.inner.on_serviced(now, serviced);
    }

    fn on_tick_end(&mut self, now: Tick, customs: &Customs) {
        if now.0 > 0 && now.0 % self.grid.ticks_per_hour() == 0 {
            tracing::info!(
                time    = %self.grid.to_wall(now),
                served  = customs.outputs().total_served(),
                queued  = customs.queued_total(),
                online  = customs.online_total(),
                "status"
            );
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("customs: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut params = SimParams {
        speed_factor:         cli.speed_factor,
        wait_threshold_min:   cli.threshold,
        momentum:             cli.momentum,
        booth_queue_capacity: cli.queue_capacity,
        seed:                 cli.seed,
        ..SimParams::default()
    };
    if let Some(t) = &cli.domestic_service {
        params.domestic_service = t.clone();
    }
    if let Some(t) = &cli.foreign_service {
        params.foreign_service = t.clone();
    }
    let grid = params.grid().context("invalid configuration")?;

    match &cli.command {
        Command::InitDb => {
            CustomsDb::create(&cli.db)
                .with_context(|| format!("creating {}", cli.db.display()))?;
            println!("initialised customs database at {}", cli.db.display());
        }

        Command::Simulate { schedule, out } => {
            let (db, roster) = open_and_prepare(&cli.db, &params, &grid)?;
            let sched = load_schedule_csv(schedule)
                .with_context(|| format!("loading {}", schedule.display()))?;

            db.reset_outcomes()?;
            let mut sim = Simulation::new(
                grid.clone(),
                sched,
                roster.dispatcher(),
                params.booth_queue_capacity,
            );
            let mut obs = HourlyProgress {
                inner: StoreOutcomeObserver::new(&db),
                grid:  grid.clone(),
            };
            let summary = sim.run(&mut obs)?;
            if let Some(e) = obs.inner.take_error() {
                return Err(e.into());
            }

            let rows = hourly_report(
                &db.wait_stats(grid.ticks_per_hour())?,
                &sim.customs.server_stats(),
                &grid,
            );
            write_report_csv(out, &rows)
                .with_context(|| format!("writing {}", out.display()))?;

            println!(
                "served {} of {} passengers from {} planes; report written to {}",
                summary.passengers_served,
                summary.passengers_loaded,
                summary.planes_dispatched,
                out.display()
            );
        }

        Command::Optimize { schedule, out, schedule_out } => {
            let (db, roster) = open_and_prepare(&cli.db, &params, &grid)?;
            let mut sched = load_schedule_csv(schedule)
                .with_context(|| format!("loading {}", schedule.display()))?;

            let optimizer = Optimizer::new(
                params.wait_threshold_min,
                params.momentum,
                params.booth_queue_capacity,
            )?;
            let summary = optimizer.optimize(&db, &roster, &mut sched, &grid)?;

            for (lane, hour) in summary.capacity_bound_hours() {
                tracing::warn!(
                    %lane,
                    hour,
                    "capacity-bound: wait stays over the threshold at full staffing"
                );
            }

            write_schedule_csv(schedule_out, &sched)
                .with_context(|| format!("writing {}", schedule_out.display()))?;
            let rows = hourly_report(&summary.wait, &summary.servers, &grid);
            write_report_csv(out, &rows)
                .with_context(|| format!("writing {}", out.display()))?;

            println!(
                "optimized in {} simulation passes; schedule written to {}, report to {}",
                summary.simulations,
                schedule_out.display(),
                out.display()
            );
        }
    }

    Ok(())
}

/// Open the store, run the roster-preparation pass, and materialise the
/// day's arrivals.
fn open_and_prepare(
    db_path: &Path,
    params:  &SimParams,
    grid:    &TimeGrid,
) -> Result<(CustomsDb, Roster)> {
    let db = CustomsDb::open(db_path)
        .with_context(|| format!("opening {}", db_path.display()))?;
    let domestic = params.service_dist(Lane::Domestic, grid)?;
    let foreign = params.service_dist(Lane::Foreign, grid)?;
    let prepared = db.assign_service_times(grid, &domestic, &foreign, params.seed)?;
    let roster = Roster::load(&db, grid)?;
    tracing::info!(
        planes     = roster.plane_count(),
        passengers = prepared,
        "roster ready"
    );
    Ok((db, roster))
}
