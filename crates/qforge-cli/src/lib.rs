//! qforge command-line interface
//!
//! Argument definitions and command implementations. The `qforge` binary
//! installs logging and hands the parsed [`Cli`] to [`run`].
//!
//! ```text
//! qforge parse bell.qasm
//! qforge optimize bell.qasm -p ionq --passes transpile,merge,cancel -o out.qasm
//! qforge estimate bell.qasm -p ibm_quantum
//! qforge sample bell.qasm --shots 2000 --seed 7
//! qforge templates generate vqe_standard --param layers=3 -o vqe.qasm
//! qforge providers
//! ```

pub mod commands;
pub mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use qforge_algorithms::ParameterValue;

pub use config::QforgeConfig;

use commands::{Session, estimate, optimize, parse, providers, sample, templates};

/// qforge - parse, optimize and estimate quantum circuits
#[derive(Debug, Parser)]
#[command(name = "qforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (defaults to ~/.qforge/config.yaml)
    #[arg(long, global = true, env = "QFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter directive implied by `-v` and `-q`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse an OpenQASM 2.0 file and summarise the circuit
    Parse(ParseArgs),

    /// Optimize a circuit for a provider
    Optimize(OptimizeArgs),

    /// Estimate fidelity and recommend error mitigation
    Estimate(EstimateArgs),

    /// Sample measurement outcomes with the provider's noise
    Sample(SampleArgs),

    /// Browse and instantiate algorithm templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// List provider profiles, or show one
    Providers {
        /// Provider id (unknown ids show the default profile)
        id: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Input file (OpenQASM 2.0)
    pub input: PathBuf,

    /// Print the circuit as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct OptimizeArgs {
    /// Input file (OpenQASM 2.0)
    pub input: PathBuf,

    /// Target provider
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Comma-separated passes, run in order
    #[arg(long, value_delimiter = ',')]
    pub passes: Vec<String>,

    /// Write the optimized circuit as QASM
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail on unknown provider ids instead of using the default profile
    #[arg(long)]
    pub strict_provider: bool,
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Input file (OpenQASM 2.0)
    pub input: PathBuf,

    /// Target provider
    #[arg(short, long)]
    pub provider: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Input file (OpenQASM 2.0)
    pub input: PathBuf,

    /// Target provider
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Number of shots
    #[arg(short, long)]
    pub shots: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    /// List every template
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a template's parameters
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Check parameters against a template
    Validate {
        id: String,

        /// Parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, ParameterValue)>,

        #[arg(long)]
        json: bool,
    },

    /// Build a template's circuit and print it as QASM
    Generate {
        id: String,

        /// Parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, ParameterValue)>,

        /// Write the circuit to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Split `key=value`, inferring the value's type.
pub fn parse_param(s: &str) -> Result<(String, ParameterValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    let value = match value.trim().parse::<ParameterValue>() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    Ok((key.to_string(), value))
}

/// Load configuration and run the selected command, writing to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = QforgeConfig::load(cli.config.as_deref())?;
    let session = Session::new(config)?;

    match &cli.command {
        Commands::Parse(args) => parse::execute(args, out),
        Commands::Optimize(args) => optimize::execute(&session, args, out),
        Commands::Estimate(args) => estimate::execute(&session, args, out),
        Commands::Sample(args) => sample::execute(&session, args, out),
        Commands::Templates { action } => match action {
            TemplateAction::List { json } => templates::list(*json, out),
            TemplateAction::Show { id, json } => templates::show(id, *json, out),
            TemplateAction::Validate { id, params, json } => {
                templates::validate(id, params, *json, out)
            }
            TemplateAction::Generate { id, params, output } => {
                templates::generate(id, params, output.as_deref(), out)
            }
        },
        Commands::Providers { id, json } => providers::execute(&session, id.as_deref(), *json, out),
    }
}
