use std::collections::HashSet;
use std::path::PathBuf;
use std::process::exit;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use workerpool::{work_fn, Job, JobError, Pool, PoolConfig, Result};

const DEFAULT_JOBS: u64 = 100;

#[derive(Parser)]
#[command(
    name = "workerpool-demo",
    version,
    about = "Runs a batch of integer jobs through a worker pool"
)]
struct Cli {
    /// Number of jobs to run
    #[arg(long, default_value_t = DEFAULT_JOBS, value_name = "COUNT")]
    jobs: u64,

    /// Number of workers; defaults to the number of CPUs, values below 1 mean 2
    #[arg(long, allow_negative_numbers = true, value_name = "COUNT")]
    workers: Option<isize>,

    /// Comma-separated job ids that should fail
    #[arg(long, value_delimiter = ',', default_values_t = [10, 20, 50], value_name = "IDS")]
    fail: Vec<u64>,

    /// Simulated work per job, in milliseconds
    #[arg(long, default_value_t = 0, value_name = "MS")]
    delay_ms: u64,

    /// Log a line for every job that starts and finishes
    #[arg(long)]
    debug: bool,

    /// JSON file with `workers` and `debug` settings, overriding the flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

/// What a run did, printed at the end.
#[derive(Debug, Serialize)]
struct RunSummary {
    jobs: usize,
    workers: usize,
    errors: usize,
    failed_ids: Vec<u64>,
    elapsed_ms: f64,
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    // Per-job progress lines are part of the demo output, so they go to stdout.
    let level = if config.debug {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::builder()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .init();

    match run(&cli, &config) {
        Ok(summary) if cli.json => match serde_json::to_string(&summary) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                error!("{}", e);
                exit(1);
            }
        },
        Ok(summary) => println!(
            "Exit after {:.3}ms with {} errors",
            summary.elapsed_ms, summary.errors
        ),
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

/// Builds the pool configuration from the flags, then lets a config file
/// override them.
fn resolve_config(cli: &Cli) -> Result<PoolConfig> {
    if let Some(path) = &cli.config {
        return PoolConfig::from_json_file(path);
    }
    Ok(PoolConfig {
        workers: cli.workers.unwrap_or(num_cpus::get() as isize),
        debug: cli.debug,
    })
}

fn run(cli: &Cli, config: &PoolConfig) -> Result<RunSummary> {
    let failing: HashSet<u64> = cli.fail.iter().copied().collect();
    let delay = Duration::from_millis(cli.delay_ms);

    let work = work_fn(move |n: &u64| {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if failing.contains(n) {
            return Err(JobError::msg(format!("job {} failed", n)));
        }
        Ok(())
    });
    let jobs = (0..cli.jobs)
        .map(|n| Job::new(n, work.clone()).with_id(n))
        .collect();

    let mut pool = Pool::with_config(jobs, config);
    if !cli.json {
        println!(
            "Started {} jobs on {} workers",
            pool.len(),
            pool.worker_count()
        );
    }
    info!("workerpool-demo {}", env!("CARGO_PKG_VERSION"));

    let started = Instant::now();
    pool.start()?;
    let elapsed = started.elapsed();

    Ok(RunSummary {
        jobs: pool.len(),
        workers: pool.worker_count(),
        errors: pool.error_count(),
        failed_ids: pool.failed_jobs().map(|job| *job.data()).collect(),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    })
}
