//! `grid_closure`: load a road network, close one road, then reset.
//!
//! Writes to the output directory:
//! - `baseline.geojson`, `closed.geojson`, `reset.geojson`
//! - `edge_traffic.csv` (baseline volumes) and `closures.csv`
//!
//! Run with:
//!   cargo run -p grid_closure --release -- --from 44 --to 54 -v

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rc_core::GeoPoint;
use rc_network::{RoadGraph, DEFAULT_CENTER};
use rc_output::{write_geojson, ClosureRow, CsvWriter, OutputWriter, TrafficRow};
use rc_sim::{ClosureKind, SessionBuilder, SessionConfig, SessionObserver};
use rc_traffic::{ClosureOutcome, TrafficMap};

use network::{default_closure, grid_template, read_topology, requested_closure};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grid_closure", about = "Simulate closing one road and rerouting its traffic")]
struct Args {
    /// Grid centre latitude
    #[arg(long, default_value_t = DEFAULT_CENTER.lat, allow_hyphen_values = true)]
    lat: f64,

    /// Grid centre longitude
    #[arg(long, default_value_t = DEFAULT_CENTER.lon, allow_hyphen_values = true)]
    lon: f64,

    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Mark every n-th row and column as a primary road
    #[arg(long)]
    arterial_every: Option<usize>,

    /// Load this JSON topology instead of generating a grid
    #[arg(long)]
    topology: Option<PathBuf>,

    /// JSON session config (traffic model, feature style)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Closure start node (defaults to the grid centre)
    #[arg(long)]
    from: Option<u32>,

    /// Closure end node
    #[arg(long)]
    to: Option<u32>,

    /// Parallel-edge discriminator of the closed road
    #[arg(long, default_value_t = 0)]
    key: u32,

    #[arg(long, default_value = "output/grid_closure")]
    out: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

// ── Output observer ───────────────────────────────────────────────────────────

/// Writes baseline volumes and closure summaries as the session runs.
struct CsvObserver {
    writer: CsvWriter,
}

impl SessionObserver for CsvObserver {
    fn on_load(&mut self, _graph: &RoadGraph, traffic: &TrafficMap) {
        if let Err(e) = self.writer.write_traffic(&TrafficRow::from_map(traffic)) {
            tracing::warn!(error = %e, "failed to write baseline traffic");
        }
    }

    fn on_closure(&mut self, outcome: &ClosureOutcome) {
        if let Err(e) = self.writer.write_closure(&ClosureRow::from(outcome)) {
            tracing::warn!(error = %e, "failed to write closure row");
        }
    }
}

impl Drop for CsvObserver {
    fn drop(&mut self) {
        if let Err(e) = self.writer.finish() {
            tracing::warn!(error = %e, "failed to flush csv output");
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SessionConfig::load(path).context("reading session config")?,
        None => SessionConfig::default(),
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let grid = grid_template(args.cols, args.rows, args.arterial_every);
    let mut builder = SessionBuilder::new()
        .config(config)
        .grid(grid.clone())
        .observer(CsvObserver { writer: CsvWriter::new(&args.out)? });
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut session = builder.build()?;

    // 1. Topology + baseline.
    let t_load = Instant::now();
    match &args.topology {
        Some(path) => session.load(read_topology(path)?)?,
        None => session.load_grid(GeoPoint::new(args.lat, args.lon))?,
    }
    let original = session.original()?;
    println!(
        "Network: {} nodes, {} edges  baseline total {}  ({:.3}s)",
        original.node_count(),
        original.edge_count(),
        session.traffic()?.total(),
        t_load.elapsed().as_secs_f64(),
    );
    export(&args.out, "baseline.geojson", &session.features()?)?;

    // 2. Closure.
    let grid_ref = args.topology.is_none().then_some(&grid);
    let Some(edge) = requested_closure(args.from, args.to, args.key)
        .or_else(|| default_closure(session.original().ok()?, grid_ref))
    else {
        bail!("network has no edges to close");
    };

    let summary = session.close_road(edge)?;
    match summary.outcome {
        ClosureKind::Rerouted => println!(
            "Closed {edge}: {} vehicles rerouted over {} edges",
            summary.closed_volume,
            summary.path.len(),
        ),
        ClosureKind::Dropped => println!(
            "Closed {edge}: no alternative route, {} vehicles dropped",
            summary.closed_volume,
        ),
        ClosureKind::NothingToMove if !summary.edge_removed => {
            println!("{edge} is not a road in this network; nothing changed")
        }
        ClosureKind::NothingToMove => println!("Closed {edge}: it carried no traffic"),
    }
    println!("Total after closure: {}", session.traffic()?.total());
    export(&args.out, "closed.geojson", &session.features()?)?;

    // 3. Reset.
    session.reset()?;
    println!("Reset: fresh baseline total {}", session.traffic()?.total());
    export(&args.out, "reset.geojson", &session.features()?)?;

    println!("Output written to {}", args.out.display());
    Ok(())
}

fn export(dir: &Path, name: &str, fc: &rc_output::FeatureCollection) -> Result<()> {
    let path = dir.join(name);
    write_geojson(&path, fc).with_context(|| format!("writing {}", path.display()))
}
