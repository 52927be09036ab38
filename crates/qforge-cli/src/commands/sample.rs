//! Sample command implementation.

use std::io::Write;

use anyhow::{Context, Result};
use console::style;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use qforge_noise::NoisySampler;

use super::common::{Session, bar, load_circuit, write_json};
use crate::SampleArgs;

/// Outcomes shown before the histogram is cut off.
const MAX_ROWS: usize = 16;

/// Execute the sample command.
pub fn execute(session: &Session, args: &SampleArgs, out: &mut dyn Write) -> Result<()> {
    let circuit = load_circuit(&args.input)?;
    let provider = session
        .registry
        .get(session.provider_id(args.provider.as_deref()));
    let shots = session.config.shots(args.shots);

    let mut rng = match session.config.seed(args.seed) {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let counts = NoisySampler::new()
        .sample(&circuit, provider, shots, &mut rng)
        .with_context(|| format!("Failed to sample {}", args.input.display()))?;

    if args.json {
        return write_json(out, &counts);
    }

    writeln!(
        out,
        "{} Results on {} ({} shots):",
        style("✓").green().bold(),
        style(&provider.id).yellow(),
        counts.total()
    )?;

    let mut sorted: Vec<(&str, usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    #[allow(clippy::cast_precision_loss)]
    let total = counts.total() as f64;
    for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
        #[allow(clippy::cast_precision_loss)]
        let percent = *count as f64 / total * 100.0;
        writeln!(
            out,
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            percent,
            style(bar(percent)).green()
        )?;
    }
    if sorted.len() > MAX_ROWS {
        writeln!(out, "  ... and {} more outcomes", sorted.len() - MAX_ROWS)?;
    }
    Ok(())
}
