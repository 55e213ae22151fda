// Centralised PRM* planning for a drone team
//
// Loads an environment TOML, plans once and optionally plots the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use multi_drone_prm::environment::{EnvironmentConfig, MultiDroneEnvironment};
use multi_drone_prm::utils::visualize_paths;
use multi_drone_prm::{CentralisedPrmStar, PlanRequest, RoboticsResult};

#[derive(Debug, Parser)]
#[command(about = "Plan a collision-free joint path for a drone team")]
struct Args {
    /// Path to the environment TOML
    #[arg(long)]
    env: PathBuf,
    /// Planning timeout [s]
    #[arg(long, default_value_t = 120.0)]
    timeout: f64,
    /// Number of samples for PRM*
    #[arg(long)]
    samples: Option<usize>,
    /// Connection radius floor for PRM*
    #[arg(long)]
    radius: Option<f64>,
    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 20)]
    k_neighbors: usize,
    /// Save the plot to this SVG file
    #[arg(long)]
    svg: Option<String>,
    /// Open an interactive gnuplot window
    #[arg(long)]
    show: bool,
}

fn run(args: &Args) -> RoboticsResult<bool> {
    let config = EnvironmentConfig::load(&args.env)?;
    let env = MultiDroneEnvironment::from_config(&config)?;

    let mut planner_config = config.planner.clone().unwrap_or_default();
    if let Some(samples) = args.samples {
        planner_config.num_samples = samples;
    }
    if let Some(radius) = args.radius {
        planner_config.connection_radius = radius;
    }

    info!(
        env = %args.env.display(),
        drones = env.num_drones(),
        timeout = args.timeout,
        samples = planner_config.num_samples,
        radius = planner_config.connection_radius,
        "planning"
    );

    let planner = CentralisedPrmStar::new(&env, planner_config)?;
    let report = planner.plan_with_report(&PlanRequest::new(args.timeout, args.seed, args.k_neighbors))?;
    let stats = report.stats.clone();
    let path = report.into_path();

    if path.is_empty() {
        println!("[FAIL] No path found within timeout.");
        return Ok(false);
    }

    println!(
        "[SUCCESS] Path found with {} steps, cost {:.2}, {:.2}s",
        path.len(),
        stats.path_cost.unwrap_or_default(),
        stats.elapsed.as_secs_f64()
    );
    if args.svg.is_some() || args.show {
        visualize_paths(&path, &env, args.svg.as_deref(), args.show)?;
    }
    Ok(true)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "planning aborted");
            ExitCode::FAILURE
        }
    }
}
