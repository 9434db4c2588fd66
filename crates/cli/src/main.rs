//! Wayfinder CLI - turn-by-turn route progress simulator.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfinder_core::{Coordinate, Step};
use wayfinder_navigation::{drive, interpolate_path, Collaborators, NavigationSession};
use wayfinder_progress::{Itinerary, TrackerConfig};
use wayfinder_services::{
    FileDirections, RecordingPresenter, RouteFile, SimulatedRegionMonitor, TracingAnnouncer,
};

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Turn-by-turn route progress simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tracker config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive along a route and print every announcement
    Simulate {
        /// Route file (JSON)
        route: PathBuf,
        /// Pickup as "lat,lon" (default: first step boundary)
        #[arg(long, value_parser = parse_coordinate)]
        from: Option<Coordinate>,
        /// Destination as "lat,lon" (default: last step boundary)
        #[arg(long, value_parser = parse_coordinate)]
        to: Option<Coordinate>,
        /// Position fixes per leg
        #[arg(long, default_value = "10")]
        samples: usize,
        /// Print the final session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the step list of a route
    Steps {
        /// Route file (JSON)
        route: PathBuf,
    },
    /// Write a sample route file
    Sample {
        /// Output path
        #[arg(default_value = "route.json")]
        out: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrackerConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    match cli.command {
        Commands::Simulate {
            route,
            from,
            to,
            samples,
            json,
        } => simulate(config, route, from, to, samples, json).await?,
        Commands::Steps { route } => {
            let file = RouteFile::load(&route)
                .await
                .with_context(|| format!("reading route {}", route.display()))?;
            print!("{}", Itinerary::from_steps(&file.steps));
        }
        Commands::Sample { out } => {
            RouteFile { steps: sample_steps() }.save(&out).await?;
            println!("Wrote sample route to {}", out.display());
        }
    }

    Ok(())
}

async fn simulate(
    config: TrackerConfig,
    route_path: PathBuf,
    from: Option<Coordinate>,
    to: Option<Coordinate>,
    samples: usize,
    json: bool,
) -> Result<()> {
    let file = RouteFile::load(&route_path)
        .await
        .with_context(|| format!("reading route {}", route_path.display()))?;
    let (Some(first), Some(last)) = (file.steps.first(), file.steps.last()) else {
        anyhow::bail!("route {} has no steps", route_path.display());
    };
    let pickup = from.unwrap_or(first.boundary);
    let destination = to.unwrap_or(last.boundary);

    let monitor = Arc::new(SimulatedRegionMonitor::new());
    let presenter = Arc::new(RecordingPresenter::new());
    let services = Collaborators {
        directions: Arc::new(FileDirections::new(&route_path)),
        monitor: monitor.clone(),
        announcer: Arc::new(TracingAnnouncer::new()),
        presenter: presenter.clone(),
    };
    let (handle, task) = NavigationSession::new(config, services).spawn();

    handle.request_route(pickup, destination).await?;
    let loaded = handle.snapshot().await?;
    if !loaded.tracking {
        anyhow::bail!("route could not be tracked");
    }
    println!("{}", loaded.view.instruction_text);

    let path = interpolate_path(&file.steps, samples);
    info!("Driving {} fixes", path.len());
    let (frames, snapshot) = drive(&handle, &monitor, &path).await?;
    for frame in &frames {
        println!("{}", frame.instruction);
    }
    if snapshot.tracking {
        println!("Drive ended before arrival (step {})", snapshot.cursor);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    handle.shutdown().await?;
    task.await?;
    info!("Presented {} view states", presenter.history().await.len());
    Ok(())
}

fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {:?}", s))?;
    let latitude: f64 = lat.trim().parse().map_err(|_| format!("bad latitude {:?}", lat))?;
    let longitude: f64 = lon.trim().parse().map_err(|_| format!("bad longitude {:?}", lon))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinate out of range: {}", s));
    }
    Ok(Coordinate::new(latitude, longitude))
}

fn sample_steps() -> Vec<Step> {
    vec![
        Step::new("Depart", 0.0, Coordinate::new(51.5007, -0.1246)),
        Step::new("Turn right onto Bridge St", 120.34, Coordinate::new(51.5010, -0.1230)),
        Step::new("Turn left onto Victoria Embankment", 412.7, Coordinate::new(51.5019, -0.1235)),
        Step::new("Arrive at destination", 15.0, Coordinate::new(51.5055, -0.1220)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c = parse_coordinate("51.5, -0.12").unwrap();
        assert_eq!(c, Coordinate::new(51.5, -0.12));
        assert!(parse_coordinate("51.5").is_err());
        assert!(parse_coordinate("91,0").is_err());
        assert!(parse_coordinate("a,b").is_err());
    }

    #[test]
    fn test_sample_route_is_trackable() {
        let steps = sample_steps();
        assert!(steps.len() > TrackerConfig::default().start_index);
    }
}
