use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use nu_plugin_symnmf::algo::init::DEFAULT_SEED;
use nu_plugin_symnmf::algo::optimize::OptimizerConfig;
use nu_plugin_symnmf::algo::points;
use nu_plugin_symnmf::ops::{self, Goal};
use nu_plugin_symnmf::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// The only line printed on failure.
const ERROR_MSG: &str = "An Error Has Occurred";

#[derive(Parser)]
#[command(
    name = "symnmf",
    version,
    about = "Symmetric non-negative matrix factorization clustering"
)]
struct Cli {
    /// Goal: sym, ddg, norm, symnmf, analyze
    goal: String,

    /// Comma-separated point file, one point per line
    file: PathBuf,

    /// Number of clusters (required for symnmf and analyze)
    #[arg(short, long = "clusters")]
    k: Option<usize>,

    /// Seed for the initial factor H
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Maximum optimizer iterations
    #[arg(long, default_value_t = 300)]
    max_iter: usize,

    /// Convergence threshold on the squared Frobenius norm of successive H
    #[arg(long, default_value_t = 1e-4)]
    tol: f64,

    /// Denominator stabilization epsilon
    #[arg(long, default_value_t = 1e-7)]
    denominator_eps: f64,

    /// Update mixing coefficient in (0, 1]
    #[arg(long, default_value_t = 0.5)]
    beta: f64,

    /// Emit JSON instead of comma-separated text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{ERROR_MSG}");
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            error!(goal = %cli.goal, file = %cli.file.display(), "{e}");
            println!("{ERROR_MSG}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String> {
    let goal = Goal::parse(&cli.goal)?;
    let config = OptimizerConfig::default()
        .max_iter(cli.max_iter)
        .convergence_eps(cli.tol)
        .denominator_eps(cli.denominator_eps)
        .beta(cli.beta);
    config.validate()?;

    let points = points::read_points(&cli.file)?;
    info!(?goal, n = points.rows(), d = points.cols(), "running goal");

    let output = ops::op_goal(goal, &points, cli.k, cli.seed, &config)?;
    if cli.json {
        Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&output.to_json()).unwrap_or_default()
        ))
    } else {
        Ok(output.to_text())
    }
}
