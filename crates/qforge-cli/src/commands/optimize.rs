//! Optimize command implementation.

use std::io::Write;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qforge_compile::Optimizer;

use super::common::{Session, load_circuit, save_circuit, write_json};
use crate::OptimizeArgs;

/// Execute the optimize command.
pub fn execute(session: &Session, args: &OptimizeArgs, out: &mut dyn Write) -> Result<()> {
    let circuit = load_circuit(&args.input)?;
    let provider = session.provider_id(args.provider.as_deref());
    let passes = session.config.passes(&args.passes);

    let optimizer =
        Optimizer::new(session.registry.clone()).with_strict_provider(args.strict_provider);
    let result = optimizer
        .optimize(&circuit, provider, passes)
        .with_context(|| format!("Failed to optimize {}", args.input.display()))?;

    if let Some(path) = &args.output {
        save_circuit(&result.optimized_circuit, path)?;
        info!("Wrote optimized circuit to {}", path.display());
    }

    if args.json {
        return write_json(out, &result);
    }

    writeln!(
        out,
        "{} Optimized {} for {}",
        style("✓").green().bold(),
        style(args.input.display()).green(),
        style(&result.provider).yellow()
    )?;
    for report in &result.passes {
        writeln!(
            out,
            "  {:<24} gates {:>4} → {:<4} depth {:>4} → {}",
            report.pass,
            report.before.gate_count,
            report.after.gate_count,
            report.before.depth,
            report.after.depth
        )?;
    }

    let final_metrics = result.passes.last().map(|r| r.after);
    writeln!(
        out,
        "  Gates: {} ({:+.1}% reduction)",
        result.optimized_circuit.gate_count(),
        result.impact.gate_reduction
    )?;
    writeln!(
        out,
        "  Depth: {} ({:+.1}% reduction)",
        result.optimized_circuit.depth(),
        result.impact.depth_reduction
    )?;
    writeln!(
        out,
        "  Fidelity: {:.4} → {:.4}",
        result.original_fidelity, result.optimized_fidelity
    )?;
    if let Some(metrics) = final_metrics {
        writeln!(out, "  Execution time: {:.0} ns", metrics.execution_time_ns)?;
    }

    for violation in &result.constraint_violations {
        writeln!(out, "  {} {violation}", style("!").yellow().bold())?;
    }
    if let Some(path) = &args.output {
        writeln!(out, "  Output: {}", style(path.display()).green())?;
    }
    Ok(())
}
