mod demos;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;
use tlm_components::{ComponentRegistry, ParameterKind, Severity};
use tlm_sim::{RunOutcome, SimConfig, SimError};
use tracing_subscriber::EnvFilter;

use demos::DemoKind;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Cannot read config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tlm-cli")]
#[command(about = "Transmission-line co-simulation of mechanical, hydraulic and signal networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List component types, or show the ports and parameters of one
    Components {
        /// Component type name
        type_name: Option<String>,
    },
    /// Run a built-in model and print probe traces as CSV
    Run {
        /// Model to run
        #[arg(value_enum)]
        demo: DemoKind,
        /// Run configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Time step in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Number of steps
        #[arg(long, default_value_t = 1000)]
        steps: u64,
        /// Run batches on a pool with this many threads
        #[arg(long)]
        threads: Option<usize>,
        /// Record every n-th step
        #[arg(long)]
        every: Option<u64>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Components { type_name } => cmd_components(type_name.as_deref()),
        Commands::Run {
            demo,
            config,
            dt,
            steps,
            threads,
            every,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)?,
                None => SimConfig::default(),
            };
            if let Some(dt) = dt {
                cfg.timestep = dt;
            }
            if let Some(threads) = threads {
                cfg = cfg.parallel(Some(threads));
            }
            if let Some(every) = every {
                cfg.log_every = every;
            }
            cmd_run(demo, cfg, steps)
        }
    }
}

fn load_config(path: &Path) -> CliResult<SimConfig> {
    let text = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_components(type_name: Option<&str>) -> CliResult<()> {
    let registry = ComponentRegistry::with_standard_library();
    let Some(type_name) = type_name else {
        println!("Component types:");
        for entry in registry.entries() {
            println!("  {:<28} {}", entry.type_name, entry.description);
        }
        return Ok(());
    };

    let component = registry.create(type_name, "preview").map_err(SimError::from)?;
    println!("{} ({} component)", component.type_name(), component.role());
    println!("\nPorts:");
    for spec in component.port_specs() {
        println!(
            "  {:<10} {:<10} {:<6} {}{}",
            spec.name,
            spec.node_type.to_string(),
            spec.kind.to_string(),
            if spec.is_required() { "required" } else { "optional" },
            if spec.multi { ", multi" } else { "" },
        );
    }
    println!("\nParameters:");
    for p in component.parameters().iter() {
        let kind = match p.kind {
            ParameterKind::Constant => "constant",
            ParameterKind::Input { .. } => "input",
            ParameterKind::Output { .. } => "output",
        };
        println!(
            "  {:<10} {:>12} {:<8} {:<9} {}",
            p.name,
            p.default,
            p.unit.symbol(),
            kind,
            p.description
        );
    }
    Ok(())
}

fn cmd_run(kind: DemoKind, mut config: SimConfig, steps: u64) -> CliResult<()> {
    config.validate()?;
    let samples = usize::try_from(steps / config.log_every + 1).unwrap_or(usize::MAX);
    config.log_capacity = config.log_capacity.max(samples);

    let mut demo = demos::build(kind)?;
    demo.system.initialize_with(config)?;
    let report = demo.system.step_range(steps)?;
    demo.system.finalize()?;

    for d in demo.system.diagnostics() {
        if d.severity >= Severity::Warning {
            eprintln!("{d}");
        }
    }
    match &report.outcome {
        RunOutcome::Completed => {}
        RunOutcome::Aborted => eprintln!("Run aborted after {} steps", report.completed_steps),
        RunOutcome::Stopped { reason } => {
            eprintln!("Run stopped after {} steps: {reason}", report.completed_steps)
        }
    }
    tracing::info!(
        steps = report.completed_steps,
        time = report.time,
        "run finished"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    write!(out, "time_s")?;
    for (label, _) in &demo.columns {
        write!(out, ",{label}")?;
    }
    writeln!(out)?;

    let traces = demo
        .columns
        .iter()
        .map(|(_, probe)| demo.system.trace(*probe))
        .collect::<Result<Vec<_>, _>>()?;
    for (row, t) in demo.system.trace_times().iter().enumerate() {
        write!(out, "{t}")?;
        for trace in &traces {
            write!(out, ",{}", trace.get(row).copied().unwrap_or(f64::NAN))?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
