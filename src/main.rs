use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};
use sched_sim::{
    Algorithm, AlgorithmKind, ProcessSpec, SimConfig, SimReport, render, sim::sample_workload,
    simulate, workload::BernoulliWorkload,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum OutputFormat {
    Table,
    Json,
}

/// Discrete-time CPU scheduling simulator
#[derive(Parser, Debug)]
#[command(name = "sched-sim")]
#[command(about = "Simulate FCFS, SJF, PRIORITY, SRT and RR scheduling", long_about = None)]
struct Args {
    /// TOML or JSON file with the algorithm and process list
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Algorithm name (FCFS, SJF, PRIORITY, SRT, RR), overrides the config
    #[arg(short, long)]
    algorithm: Option<AlgorithmKind>,

    /// Round-Robin quantum in ticks
    #[arg(short, long, allow_negative_numbers = true)]
    quantum: Option<i64>,

    /// Round-Robin context switch cost in ticks
    #[arg(short = 's', long, allow_negative_numbers = true)]
    context_switch: Option<i64>,

    /// Generate a random workload spanning this many ticks instead
    #[arg(short, long)]
    random: Option<u64>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run every algorithm on the same workload
    #[arg(long, default_value_t = false)]
    compare: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER).map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
    log::set_max_level(level);
    Ok(())
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SimConfig::default(),
    };

    if let Some(ticks) = args.random {
        config.processes = BernoulliWorkload {
            ticks,
            seed: args.seed,
            ..Default::default()
        }
        .generate();
    } else if args.config.is_none() {
        config.processes = sample_workload();
    }

    if let Some(kind) = args.algorithm {
        config.algorithm = Some(kind.to_string());
    }
    if args.quantum.is_some() {
        config.quantum = args.quantum;
    }
    if args.context_switch.is_some() {
        config.context_switch = args.context_switch;
    }

    Ok(config)
}

fn algorithms_to_run(args: &Args, config: &SimConfig) -> Result<Vec<Algorithm>> {
    if !args.compare {
        return Ok(vec![config.algorithm()?]);
    }

    // RR needs a quantum even when the config names another algorithm
    let quantum = config.quantum.or(Some(2));
    AlgorithmKind::ALL
        .into_iter()
        .map(|kind| {
            Algorithm::from_parts(kind, quantum, config.context_switch).map_err(anyhow::Error::from)
        })
        .collect()
}

fn print_run(format: OutputFormat, algorithm: &Algorithm, specs: &[ProcessSpec]) -> Result<()> {
    let result = simulate(algorithm, specs)?;

    match format {
        OutputFormat::Table => {
            println!("== {algorithm}");
            println!("{}\n", render::gantt(&result));
            println!("{}\n", render::metrics_table(&result));
        }
        OutputFormat::Json => {
            let report = SimReport::new(algorithm, &result);
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = load_config(&args)?;
    let algorithms = algorithms_to_run(&args, &config)?;

    for algorithm in &algorithms {
        print_run(args.format, algorithm, &config.processes)
            .with_context(|| format!("{algorithm} simulation failed"))?;
    }

    Ok(())
}
