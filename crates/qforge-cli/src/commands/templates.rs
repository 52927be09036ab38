//! Templates command implementation.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qforge_algorithms::{ParameterKind, ParameterSpec, ParameterValue, Parameters, TemplateLibrary};
use qforge_qasm::emit;

use super::common::{save_circuit, write_json};

fn to_parameters(params: &[(String, ParameterValue)]) -> Parameters {
    params.iter().cloned().collect()
}

fn describe_kind(spec: &ParameterSpec) -> String {
    let range = |min: Option<String>, max: Option<String>| match (min, max) {
        (Some(min), Some(max)) => format!(" in [{min}, {max}]"),
        (Some(min), None) => format!(" >= {min}"),
        (None, Some(max)) => format!(" <= {max}"),
        (None, None) => String::new(),
    };
    match &spec.kind {
        ParameterKind::Integer { min, max } => format!(
            "integer{}",
            range(min.map(|v| v.to_string()), max.map(|v| v.to_string()))
        ),
        ParameterKind::Float { min, max } => format!(
            "float{}",
            range(min.map(|v| format!("{v:.4}")), max.map(|v| format!("{v:.4}")))
        ),
        ParameterKind::Choice { options } => format!("one of {}", options.join("|")),
        ParameterKind::Boolean => "boolean".to_string(),
    }
}

/// List every built-in template.
pub fn list(json: bool, out: &mut dyn Write) -> Result<()> {
    let library = TemplateLibrary::builtin();
    if json {
        return write_json(out, library.templates());
    }
    writeln!(out, "{} Algorithm templates:\n", style("qforge").cyan().bold())?;
    for template in library.templates() {
        writeln!(
            out,
            "  {:<14} {:<17} {:<13} {}",
            style(&template.id).bold(),
            template.category.to_string(),
            template.difficulty.to_string(),
            template.name
        )?;
    }
    Ok(())
}

/// Show one template's description and parameters.
pub fn show(id: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    let library = TemplateLibrary::builtin();
    let template = library.get(id)?;
    if json {
        return write_json(out, template);
    }
    writeln!(
        out,
        "{} ({}, {})",
        style(&template.name).bold(),
        template.category,
        template.difficulty
    )?;
    writeln!(out, "  {}\n", template.description)?;
    writeln!(out, "  Parameters:")?;
    for spec in &template.parameters {
        let default = match (&spec.default, spec.required) {
            (_, true) => "required".to_string(),
            (Some(value), false) => format!("default {value}"),
            (None, false) => "optional".to_string(),
        };
        writeln!(
            out,
            "    {:<18} {:<28} {:<16} {}",
            style(&spec.name).cyan(),
            describe_kind(spec),
            default,
            spec.description
        )?;
    }
    Ok(())
}

/// Validate parameters, failing when any are invalid.
pub fn validate(
    id: &str,
    params: &[(String, ParameterValue)],
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let library = TemplateLibrary::builtin();
    let report = library.validate_parameters(id, &to_parameters(params))?;

    if json {
        write_json(out, &report)?;
    } else if report.valid {
        writeln!(out, "{} Parameters are valid for {}", style("✓").green().bold(), id)?;
    } else {
        writeln!(
            out,
            "{} {} parameter error(s) for {}:",
            style("✗").red().bold(),
            report.errors.len(),
            id
        )?;
        for error in &report.errors {
            writeln!(out, "  {} {}", style(&error.field).yellow(), error.message)?;
        }
    }

    if !report.valid {
        anyhow::bail!("Invalid parameters for template '{id}'");
    }
    Ok(())
}

/// Generate a circuit and write it as QASM to `output` or `out`.
pub fn generate(
    id: &str,
    params: &[(String, ParameterValue)],
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let library = TemplateLibrary::builtin();
    let circuit = library
        .generate_circuit(id, &to_parameters(params))
        .with_context(|| format!("Failed to generate template '{id}'"))?;

    match output {
        Some(path) => {
            save_circuit(&circuit, path)?;
            writeln!(
                out,
                "{} Generated {} ({} qubits, {} gates) → {}",
                style("✓").green().bold(),
                id,
                circuit.num_qubits(),
                circuit.gate_count(),
                style(path.display()).green()
            )?;
        }
        None => write!(out, "{}", emit(&circuit))?,
    }
    Ok(())
}
