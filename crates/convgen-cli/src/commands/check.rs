//! `convgen check`: what would be generated, and what still needs a
//! hand-written conversion.

use std::fmt::Write;

use convgen_compiler::render::public_function_name;
use convgen_compiler::synth::SuppressReason;
use convgen_compiler::{GeneratedFile, WrapperState};
use convgen_core::Universe;
use serde::Serialize;

use super::common::{CliError, GenerationArgs, Result, exit_on_error, generate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub struct CheckArgs {
    pub generation: GenerationArgs,
    pub format: ReportFormat,
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub namespace: String,
    pub conversions: Vec<ConversionReport>,
}

#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub function: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new(universe: &Universe, files: &[GeneratedFile]) -> Self {
        let files = files
            .iter()
            .map(|file| FileReport {
                namespace: file.namespace.clone(),
                conversions: file
                    .conversions
                    .iter()
                    .map(|conversion| {
                        let reason = match &conversion.state {
                            WrapperState::PublicSuppressed(reason) => Some(reason.to_string()),
                            _ => None,
                        };
                        ConversionReport {
                            function: public_function_name(universe, conversion.pair()),
                            state: conversion.state.label(),
                            reason,
                            field_errors: conversion
                                .function
                                .field_errors
                                .iter()
                                .map(ToString::to_string)
                                .collect(),
                            warnings: conversion
                                .function
                                .warnings
                                .iter()
                                .map(ToString::to_string)
                                .collect(),
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { files }
    }

    /// Conversions whose public wrapper was suppressed by field errors.
    pub fn suppressed_by_errors(files: &[GeneratedFile]) -> usize {
        files
            .iter()
            .flat_map(|file| &file.conversions)
            .filter(|conversion| {
                matches!(
                    conversion.state,
                    WrapperState::PublicSuppressed(SuppressReason::FieldErrors(_))
                )
            })
            .count()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let public = file
                .conversions
                .iter()
                .filter(|conversion| conversion.reason.is_none())
                .count();
            let _ = writeln!(
                out,
                "{} ({} conversions, {public} public)",
                file.namespace,
                file.conversions.len()
            );
            for conversion in &file.conversions {
                match &conversion.reason {
                    Some(reason) => {
                        let _ = writeln!(out, "  {}: {} ({reason})", conversion.function, conversion.state);
                    }
                    None => {
                        let _ = writeln!(out, "  {}: {}", conversion.function, conversion.state);
                    }
                }
                for error in &conversion.field_errors {
                    let _ = writeln!(out, "    error: {error}");
                }
                for warning in &conversion.warnings {
                    let _ = writeln!(out, "    warning: {warning}");
                }
            }
        }
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn run(args: CheckArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &CheckArgs) -> Result<()> {
    let (universe, files) = generate(&args.generation)?;
    let report = Report::new(&universe, &files);

    match args.format {
        ReportFormat::Text => print!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", report.render_json()?),
    }

    let suppressed = Report::suppressed_by_errors(&files);
    if args.strict && suppressed > 0 {
        return Err(CliError::Suppressed(suppressed));
    }
    Ok(())
}
