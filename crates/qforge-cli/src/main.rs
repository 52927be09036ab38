//! qforge command-line entry point.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qforge_cli::Cli;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins unless -q was given
    let filter = if cli.quiet {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = qforge_cli::run(&cli, &mut out) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
