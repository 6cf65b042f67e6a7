//! circuitkit CLI: compile, inspect, and render vtrees, circuits, and SDDs.

use anyhow::Result;
use circuitkit::config::{Config, LoggingConfig};
use circuitkit::dag::queries::{is_decomposable, is_smooth, model_count, sat_prob, uniform_prior, variable_scope};
use circuitkit::dag::rewrites::{forget, propagate_constants, smooth};
use circuitkit::format;
use circuitkit::lit::Var;
use circuitkit::Circuit;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "circuitkit")]
#[command(about = "Hash-consed logical circuits, vtrees, and canonical SDDs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Cnf,
    Dnf,
    Sdd,
}

#[derive(Clone, Copy, ValueEnum)]
enum RewriteKind {
    PropagateConstants,
    Forget,
    Smooth,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a vtree text file and report its shape.
    Vtree {
        /// Path to a vtree text file (`L`/`I` lines).
        path: PathBuf,
    },

    /// Parse an SDD text file and report its node/variable counts and a
    /// trim/compression shape check.
    Sdd {
        /// Path to an SDD text file (`T`/`F`/`L`/`D` lines).
        path: PathBuf,
        /// An optional vtree text file to report alongside.
        #[arg(long)]
        vtree: Option<PathBuf>,
        /// Print node/variable counts and run the shape/uniqueness checks.
        #[arg(long)]
        stats: bool,
    },

    /// Parse a CNF, DNF, or SDD-shaped text file into a circuit, apply a
    /// rewrite, and report its structural queries.
    Compile {
        /// Path to the input file.
        path: PathBuf,
        /// The input's line grammar.
        #[arg(long, value_enum, default_value_t = InputFormat::Cnf)]
        format: InputFormat,
        /// Which rewrite to apply before reporting.
        #[arg(long, value_enum, default_value_t = RewriteKind::PropagateConstants)]
        rewrite: RewriteKind,
        /// For `--rewrite forget`: forget every variable whose index
        /// exceeds this bound.
        #[arg(long)]
        forget_above: Option<u32>,
        /// Variable count to use for model counting (defaults to the
        /// circuit's own variable scope).
        #[arg(long)]
        n_vars: Option<u32>,
    },

    /// Render a compiled circuit as Graphviz DOT.
    Dot {
        /// Path to the input file.
        path: PathBuf,
        /// The input's line grammar.
        #[arg(long, value_enum, default_value_t = InputFormat::Cnf)]
        format: InputFormat,
        /// Write the DOT output here instead of stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    init_tracing(&config.logging);

    let cli = Cli::parse();
    match cli.command {
        Commands::Vtree { path } => cmd_vtree(&path),
        Commands::Sdd { path, vtree, stats } => cmd_sdd(&path, vtree.as_ref(), stats),
        Commands::Compile { path, format, rewrite, forget_above, n_vars } => {
            cmd_compile(&path, format, rewrite, forget_above, n_vars)
        }
        Commands::Dot { path, format, output } => cmd_dot(&path, format, output.as_ref()),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cmd_vtree(path: &PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    let lines = format::parse_vtree(&text)?;
    let vtree = format::compile_vtree(&lines)?;
    info!(nodes = vtree.len(), "vtree_compiled");
    println!("vtree: {} nodes, root = {}", vtree.len(), vtree.root().index());
    Ok(())
}

fn cmd_sdd(path: &PathBuf, vtree: Option<&PathBuf>, stats: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    let circuit = format::compile_sdd(&format::parse_sdd(&text)?)?;
    info!(nodes = circuit.len(), "circuit_compiled");

    if let Some(vtree_path) = vtree {
        let vtree_text = std::fs::read_to_string(vtree_path)?;
        let vt = format::compile_vtree(&format::parse_vtree(&vtree_text)?)?;
        println!("vtree: {} nodes, {} variables", vt.len(), vt.var_count(vt.root()));
        info!(nodes = vt.len(), "vtree_compiled");
    }

    println!("sdd: {} nodes, {} variables", circuit.len(), variable_scope(&circuit).len());
    if stats {
        circuit.validate_structure()?;
        match circuit.validate_sdd_shape() {
            Ok(()) => println!("sdd: trimmed/compressed decision shape ok"),
            Err(violation) => {
                tracing::error!(%violation, "canonicality_violation");
                return Err(violation.into());
            }
        }
    }
    Ok(())
}

fn cmd_compile(path: &PathBuf, format: InputFormat, rewrite: RewriteKind, forget_above: Option<u32>, n_vars: Option<u32>) -> Result<()> {
    let circuit = read_circuit(path, format)?;
    let before = circuit.len();
    let rewritten = match rewrite {
        RewriteKind::PropagateConstants => propagate_constants(&circuit),
        RewriteKind::Forget => {
            let threshold = forget_above.unwrap_or(u32::MAX);
            forget(&circuit, |v: Var| v.index() > threshold)
        }
        RewriteKind::Smooth => smooth(&circuit),
    };
    info!(before, after = rewritten.len(), "rewrite_applied");
    report_circuit(&rewritten, n_vars)
}

fn cmd_dot(path: &PathBuf, format: InputFormat, output: Option<&PathBuf>) -> Result<()> {
    let circuit = read_circuit(path, format)?;
    let dot = format::to_dot(&circuit, "circuit");
    match output {
        Some(out) => std::fs::write(out, dot)?,
        None => println!("{dot}"),
    }
    Ok(())
}

fn read_circuit(path: &PathBuf, format: InputFormat) -> Result<Circuit> {
    let text = std::fs::read_to_string(path)?;
    let circuit = match format {
        InputFormat::Cnf => circuitkit::format::parse_cnf(&text)?,
        InputFormat::Dnf => circuitkit::format::parse_dnf(&text)?,
        InputFormat::Sdd => circuitkit::format::compile_sdd(&circuitkit::format::parse_sdd(&text)?)?,
    };
    info!(nodes = circuit.len(), "circuit_compiled");
    Ok(circuit)
}

fn report_circuit(circuit: &Circuit, n_vars: Option<u32>) -> Result<()> {
    let decomposable = is_decomposable(circuit);
    let smooth = is_smooth(circuit);
    let count = model_count(circuit, n_vars);
    let prob = sat_prob(circuit, &uniform_prior);

    println!("nodes: {}", circuit.len());
    println!("decomposable: {decomposable}");
    println!("smooth: {smooth}");
    println!("model count: {count}");
    println!("sat probability (uniform prior): {prob}");
    Ok(())
}
