//! Overtime command: computes the result and writes it out.

use std::io::Write;

use anyhow::{Context, Result};
use ot_core::{
    OvertimeConfig, OvertimeReport, OvertimeSummary, ReportService, compute_overtime,
    format_signed_duration,
};

/// Output format of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The signed overtime on a single line, e.g. `-2h15m0s`.
    Text,
    Json,
}

/// Formats the report as a single human-readable line.
pub fn format_text(report: &OvertimeReport) -> String {
    format_signed_duration(report.overtime)
}

/// Formats the report as pretty-printed JSON.
pub fn format_json(report: &OvertimeReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&OvertimeSummary::from(report))?)
}

/// Runs the overtime computation and writes the result to `writer`.
pub fn run<W, S>(
    writer: &mut W,
    config: &OvertimeConfig,
    service: &S,
    format: OutputFormat,
) -> Result<OvertimeReport>
where
    W: Write,
    S: ReportService + ?Sized,
{
    let report = compute_overtime(config, service).context("failed to compute overtime")?;
    tracing::debug!(
        worked_ms = report.worked.num_milliseconds(),
        expected_ms = report.expected.num_milliseconds(),
        overtime_ms = report.overtime.num_milliseconds(),
        "computed overtime"
    );

    let output = match format {
        OutputFormat::Text => format_text(&report),
        OutputFormat::Json => format_json(&report)?,
    };
    writeln!(writer, "{output}")?;
    Ok(report)
}
