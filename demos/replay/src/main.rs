//! replay — end-to-end demo of the route-progress tracker.
//!
//! Plans a three-stop delivery run across downtown Mobile, Alabama with the
//! offline `DirectSolver`, then simulates driving it with GPS jitter and one
//! wrong turn.  The tracker detects the deviation, reroutes, and finishes
//! the trip; every event is printed and the whole trip is logged to CSV.
//!
//! ```text
//! cargo run -p replay                      # default config
//! cargo run -p replay -- trip.json         # TripConfig as JSON
//! RUST_LOG=debug cargo run -p replay       # per-fix tracing
//! ```

use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use nav_core::FixTime;
use nav_output::{CsvLogWriter, LogWriter, TripLogObserver};
use nav_route::{DirectSolver, ReroutingStrategy, load_stops_reader};
use nav_session::{NavEvent, SimulatedSource, TripBuilder, TripConfig, TripObserver, TripState};
use nav_tracking::TrackingStatus;

// ── Constants ─────────────────────────────────────────────────────────────────

const SPEED_MPS:      f64 = 14.0; // ~50 km/h city driving
const FIX_INTERVAL:   Duration = Duration::from_secs(1);
const NOISE_SIGMA_M:  f64 = 4.0;
const SEED:           u64 = 42;
const DETOUR_START_M: f64 = 1_200.0;
const DETOUR_LEN_M:   f64 = 500.0;
const DETOUR_SIDE_M:  f64 = 120.0;
const OUTPUT_DIR:     &str = "output/replay";

// ── Stops CSV ─────────────────────────────────────────────────────────────────

// Depot at stop 0; the driver starts there.
const STOPS_CSV: &str = "\
sequence,lat,lon,name\n\
0,30.69130,-88.04310,Depot\n\
1,30.68420,-88.05970,Midtown\n\
2,30.69640,-88.07940,Spring Hill\n\
";

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints events and a progress line every `every` fixes, then forwards
/// everything to the trip log.
struct Console<W: LogWriter> {
    log:    TripLogObserver<W>,
    every:  usize,
    fixes:  usize,
    events: usize,
}

impl<W: LogWriter> Console<W> {
    fn new(log: TripLogObserver<W>, every: usize) -> Self {
        Self { log, every: every.max(1), fixes: 0, events: 0 }
    }
}

impl<W: LogWriter> TripObserver for Console<W> {
    fn on_progress(&mut self, status: &TrackingStatus) {
        if self.fixes % self.every == 0 {
            println!(
                "  [{}] to {}: {} / {}  ({}, {:.0} m off route{})",
                status.fix_time,
                status.current_destination_index,
                status.distance_remaining_text(),
                status.time_remaining_text(),
                status.destination_status.as_str(),
                status.distance_from_route_m,
                if status.is_on_route { "" } else { ", DEVIATED" },
            );
        }
        self.fixes += 1;
        self.log.on_progress(status);
    }

    fn on_event(&mut self, event: &NavEvent) {
        println!("* {event}");
        self.events += 1;
        self.log.on_event(event);
    }

    fn on_trip_end(&mut self, state: TripState) {
        self.log.on_trip_end(state);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<TripConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(TripConfig {
            rerouting: Some(ReroutingStrategy::ToNextWaypoint),
            ..Default::default()
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: TripConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== replay — route progress tracking ===");

    // 1. Configuration.
    let config = load_config()?;
    config.validate()?;
    println!(
        "Rerouting: {}  |  tolerance {} m × {} fixes",
        config.rerouting.map(|s| s.as_str()).unwrap_or("disabled"),
        config.tracking.off_route_tolerance_m,
        config.tracking.off_route_debounce,
    );

    // 2. Stops and the first route.
    let stops = load_stops_reader(Cursor::new(STOPS_CSV))?;
    let origin = stops.first().map(|s| s.coordinate).context("stop list is empty")?;
    let mut trip = TripBuilder::new(DirectSolver::new()).config(config).solve(origin, stops).await?;
    let route = trip.route();
    println!(
        "Route: {} stops, {:.0} m, {} maneuvers",
        route.stops().len(),
        route.total_length_m(),
        route.maneuvers().len()
    );
    for m in route.maneuvers() {
        println!("  {:>6.0} m  {}", m.offset_m, m.instruction);
    }
    println!();

    // 3. Simulated drive with a wrong turn.
    let mut source = SimulatedSource::new((*route).clone(), SPEED_MPS, FIX_INTERVAL)?
        .with_noise(NOISE_SIGMA_M, SEED)
        .with_detour(DETOUR_START_M, DETOUR_LEN_M, DETOUR_SIDE_M)
        .starting_at(FixTime::now());

    // 4. Trip log.
    let writer = CsvLogWriter::new(Path::new(OUTPUT_DIR))?;
    let mut console = Console::new(TripLogObserver::new(writer), 30);

    // 5. Run.
    let t0 = Instant::now();
    let state = trip.run(&mut source, &mut console).await?;
    let elapsed = t0.elapsed();

    if let Some(e) = console.log.take_error() {
        eprintln!("trip log error: {e}");
    }

    // 6. Summary.
    println!();
    println!("Trip {} in {:.3} s", state.as_str(), elapsed.as_secs_f64());
    println!("  fixes processed : {}", console.fixes);
    println!("  events          : {}", console.events);
    println!("  reroutes        : {}", trip.reroute_requests());
    println!("  route revision  : {}", trip.active_route().revision());
    println!("  trip log        : {OUTPUT_DIR}/progress.csv, {OUTPUT_DIR}/events.csv");

    Ok(())
}
