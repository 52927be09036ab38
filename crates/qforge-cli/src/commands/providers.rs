//! Providers command implementation.

use std::io::Write;

use anyhow::Result;
use console::style;

use qforge_target::ProviderConstraints;

use super::common::{Session, write_json};

/// Execute the providers command.
pub fn execute(session: &Session, id: Option<&str>, json: bool, out: &mut dyn Write) -> Result<()> {
    match id {
        Some(id) => {
            let profile = session.registry.get(id);
            if json {
                write_json(out, profile)
            } else {
                describe(profile, out)
            }
        }
        None => {
            let profiles = session.registry.profiles();
            if json {
                return write_json(out, &profiles);
            }
            writeln!(out, "{} Provider profiles:\n", style("qforge").cyan().bold())?;
            for profile in profiles {
                writeln!(
                    out,
                    "  {:<18} {:>4} qubits  {:<6} noise  {}",
                    style(&profile.id).bold(),
                    profile.max_qubits,
                    profile.noise_level.to_string(),
                    profile.native_gates.iter().collect::<Vec<_>>().join(", ")
                )?;
            }
            Ok(())
        }
    }
}

fn describe(profile: &ProviderConstraints, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{} ({})",
        style(&profile.name).bold(),
        style(&profile.id).yellow()
    )?;
    writeln!(out, "  Max qubits: {}", profile.max_qubits)?;
    writeln!(out, "  Max depth: {}", profile.max_depth)?;
    writeln!(out, "  Max gates: {}", profile.max_gate_count)?;
    writeln!(out, "  Noise level: {}", profile.noise_level)?;
    writeln!(
        out,
        "  Native gates: {}",
        profile.native_gates.iter().collect::<Vec<_>>().join(", ")
    )?;
    writeln!(
        out,
        "  Gate times: {} ns (1q), {} ns (2q), {} ns (measure)",
        profile.avg_gate_time_ns, profile.two_qubit_gate_time_ns, profile.measure_time_ns
    )?;
    writeln!(
        out,
        "  Errors: {} (1q), {} (2q), {} (readout), {} (crosstalk)",
        profile.single_qubit_error,
        profile.two_qubit_error,
        profile.readout_error,
        profile.crosstalk
    )?;
    writeln!(out, "  Coherence: T1 {} µs, T2 {} µs", profile.t1_us, profile.t2_us)?;
    Ok(())
}
