//! Parse command implementation.

use std::io::Write;

use anyhow::Result;
use console::style;

use super::common::{load_circuit, write_json};
use crate::ParseArgs;

/// Execute the parse command.
pub fn execute(args: &ParseArgs, out: &mut dyn Write) -> Result<()> {
    let circuit = load_circuit(&args.input)?;
    if args.json {
        return write_json(out, &circuit);
    }

    writeln!(
        out,
        "{} Parsed {}",
        style("✓").green().bold(),
        style(args.input.display()).green()
    )?;
    writeln!(out, "  Qubits: {}", circuit.num_qubits())?;
    writeln!(out, "  Classical bits: {}", circuit.num_clbits())?;
    writeln!(out, "  Gates: {}", circuit.gate_count())?;
    writeln!(out, "  Two-qubit gates: {}", circuit.two_qubit_gate_count())?;
    writeln!(out, "  Depth: {}", circuit.depth())?;
    writeln!(out, "  Operations:")?;
    for (name, count) in circuit.count_ops() {
        writeln!(out, "    {name:<8} {count}")?;
    }
    Ok(())
}
