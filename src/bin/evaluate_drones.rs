// Repeated PRM* trials over a set of environments
//
// Prints success rate, mean planning time and a 95% confidence interval
// for each environment file. With `--svg-dir` the first successful path of
// every environment is plotted.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use multi_drone_prm::environment::{EnvironmentConfig, MultiDroneEnvironment};
use multi_drone_prm::evaluation::{first_success, run_trials, summarize_with, IntervalMethod};
use multi_drone_prm::utils::visualize_paths;
use multi_drone_prm::{PlanRequest, RoboticsResult};

#[derive(Debug, Parser)]
#[command(about = "Evaluate centralised PRM* over several environments")]
struct Args {
    /// Environment TOML files
    #[arg(required = true)]
    envs: Vec<PathBuf>,
    #[arg(long, default_value_t = 10)]
    trials: usize,
    /// Planning timeout per trial [s]
    #[arg(long, default_value_t = 120.0)]
    timeout: f64,
    /// Base seed; trial i uses seed + i
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 20)]
    k_neighbors: usize,
    /// Use a Student-t interval instead of the normal approximation
    #[arg(long)]
    student_t: bool,
    /// Directory for `<env>.svg` plots of the first successful trial
    #[arg(long)]
    svg_dir: Option<PathBuf>,
}

fn evaluate(path: &Path, args: &Args) -> RoboticsResult<()> {
    let config = EnvironmentConfig::load(path)?;
    let env = MultiDroneEnvironment::from_config(&config)?;
    info!(env = %path.display(), drones = env.num_drones(), "testing environment");

    let request = PlanRequest::new(args.timeout, args.seed, args.k_neighbors);
    let records = run_trials(&env, &config.planner.unwrap_or_default(), &request, args.trials)?;
    let method = if args.student_t {
        IntervalMethod::StudentT
    } else {
        IntervalMethod::Normal
    };
    let summary = summarize_with(&records, method);

    if let (Some(dir), Some(first)) = (&args.svg_dir, first_success(&records)) {
        let stem = path.file_stem().map_or_else(|| "env".into(), |s| s.to_string_lossy());
        let svg = dir.join(format!("{}.svg", stem));
        visualize_paths(&first.path, &env, Some(&svg.to_string_lossy()), false)?;
        info!(trial = first.index + 1, svg = %svg.display(), "plotted first successful trial");
    }

    println!("\n{} ({} drones) summary:", path.display(), env.num_drones());
    println!("  Success: {}/{}", summary.successes, summary.trials);
    match (summary.mean_secs, summary.ci95_secs) {
        (Some(mean), Some(ci)) => println!("  Mean time: {:.2}s +/- {:.2}s (95% CI)", mean, ci),
        _ => println!("  No successful runs"),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    for path in &args.envs {
        if let Err(e) = evaluate(path, &args) {
            error!(env = %path.display(), error = %e, "evaluation failed");
        }
    }
}
