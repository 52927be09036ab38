//! Shared helpers for CLI commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use qforge_ir::Circuit;
use qforge_qasm::{emit, parse};
use qforge_target::ProviderRegistry;

use crate::config::QforgeConfig;

/// Configuration and the provider registry it produces.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: QforgeConfig,
    pub registry: ProviderRegistry,
}

impl Session {
    pub fn new(config: QforgeConfig) -> Result<Self> {
        config.validate()?;
        let registry = config.registry();
        Ok(Self { config, registry })
    }

    /// The `-p` flag, else the configured default provider.
    pub fn provider_id<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        self.config.provider(flag)
    }
}

/// Load a circuit from an OpenQASM 2.0 file, named after the file stem.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut circuit =
        parse(&source).with_context(|| format!("Failed to parse {}", path.display()))?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        circuit.set_name(stem);
    }
    Ok(circuit)
}

/// Write a circuit as OpenQASM 2.0.
pub fn save_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    fs::write(path, emit(circuit))
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Horizontal bar for a percentage, one block per two percent.
pub fn bar(percent: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let len = (percent / 2.0).round().max(0.0) as usize;
    "█".repeat(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length() {
        assert_eq!(bar(0.0).chars().count(), 0);
        assert_eq!(bar(50.0).chars().count(), 25);
        assert_eq!(bar(100.0).chars().count(), 50);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_circuit(Path::new("/nonexistent/bell.qasm")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
