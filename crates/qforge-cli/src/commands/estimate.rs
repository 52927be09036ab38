//! Estimate command implementation.

use std::io::Write;

use anyhow::Result;
use console::style;
use serde::Serialize;

use qforge_noise::{FidelityEstimate, MitigationStrategy, NoiseModeler};

use super::common::{Session, load_circuit, write_json};
use crate::EstimateArgs;

#[derive(Debug, Serialize)]
struct EstimateReport {
    estimate: FidelityEstimate,
    strategies: Vec<MitigationStrategy>,
}

/// Execute the estimate command.
pub fn execute(session: &Session, args: &EstimateArgs, out: &mut dyn Write) -> Result<()> {
    let circuit = load_circuit(&args.input)?;
    let provider = session.provider_id(args.provider.as_deref());

    let modeler = NoiseModeler::new(session.registry.clone());
    let report = EstimateReport {
        estimate: modeler.estimate_fidelity(&circuit, provider),
        strategies: modeler.get_error_mitigation_strategies(&circuit, provider),
    };

    if args.json {
        return write_json(out, &report);
    }

    let estimate = &report.estimate;
    writeln!(
        out,
        "{} Estimated fidelity of {} on {}: {}",
        style("→").cyan().bold(),
        style(args.input.display()).green(),
        style(&estimate.provider).yellow(),
        style(format!("{:.4}", estimate.overall_fidelity)).bold()
    )?;
    writeln!(out, "  Gate error:        {:.4}", estimate.gate_error)?;
    writeln!(out, "  Decoherence error: {:.4}", estimate.decoherence_error)?;
    writeln!(out, "  Crosstalk error:   {:.4}", estimate.crosstalk_error)?;
    writeln!(out, "  Readout error:     {:.4}", estimate.readout_error)?;
    writeln!(out, "  Execution time:    {:.0} ns", estimate.execution_time_ns)?;

    if report.strategies.is_empty() {
        writeln!(out, "\n  No mitigation strategies apply.")?;
        return Ok(());
    }
    writeln!(out, "\n  Recommended mitigation:")?;
    for strategy in &report.strategies {
        writeln!(
            out,
            "    {} {} (×{:.1} shots, fidelity → {:.4})",
            style("●").green(),
            style(&strategy.name).bold(),
            strategy.shot_overhead,
            strategy.projected_fidelity
        )?;
        writeln!(out, "      {}", strategy.description)?;
    }
    Ok(())
}
