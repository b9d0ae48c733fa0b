//! Findings and the reporter: ordering, deduplication, rendering.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::evm::EvmVersion;
use crate::unit::SourceUnit;

/// Severity levels for findings.
///
/// The derived ordering (`Error < Warning < Info`) is the display order:
/// at the same source location, errors sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A region of source text. Lines and columns are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Span covering the given tree node.
    pub fn of(node: Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            line: start.row + 1,
            column: start.column + 1,
            end_line: end.row + 1,
            end_column: end.column + 1,
        }
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One diagnostic finding.
///
/// Immutable once produced; equality covers every field, so two findings
/// with identical fields are indistinguishable. Tasks emit findings, the
/// reporter owns them from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    pub severity: Severity,
    pub message: String,
    /// Identifier of the unit the finding belongs to.
    pub file: String,
    pub span: SourceSpan,
    /// Name of the task that produced the finding.
    pub origin: &'static str,
}

impl ReportItem {
    /// Build a finding anchored to a node of `unit`.
    pub fn at_node(
        severity: Severity,
        message: impl Into<String>,
        unit: &SourceUnit,
        node: Node,
        origin: &'static str,
    ) -> Self {
        Self::at_span(severity, message, unit, SourceSpan::of(node), origin)
    }

    /// Build a finding at an explicit span of `unit`.
    pub fn at_span(
        severity: Severity,
        message: impl Into<String>,
        unit: &SourceUnit,
        span: SourceSpan,
        origin: &'static str,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            file: unit.path().to_string(),
            span,
            origin,
        }
    }
}

/// Order findings for output: by file, then source location, then severity
/// (errors first), then origin name. Stable across runs with the same
/// input.
pub fn sort_findings(findings: &mut [ReportItem]) {
    findings.sort_by(|a, b| {
        (a.file.as_str(), a.span.line, a.span.column, a.severity, a.origin).cmp(&(
            b.file.as_str(),
            b.span.line,
            b.span.column,
            b.severity,
            b.origin,
        ))
    });
}

/// Drop repeated identical findings. Call after `sort_findings`; the
/// finder never suppresses duplicates itself.
pub fn dedup_findings(findings: &mut Vec<ReportItem>) {
    findings.dedup();
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report across all analyzed units.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub evm_version: String,
    pub total_findings: usize,
    pub files: Vec<JsonFileReport>,
}

/// Findings for one unit.
#[derive(Serialize, Deserialize)]
pub struct JsonFileReport {
    pub file: String,
    pub findings: Vec<JsonFinding>,
}

/// One finding on the wire.
#[derive(Serialize, Deserialize)]
pub struct JsonFinding {
    pub task: String,
    pub severity: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
}

/// Write all findings in JSON format, one entry per unit in input order.
pub fn write_json(evm: EvmVersion, reports: &[(String, Vec<ReportItem>)]) -> anyhow::Result<()> {
    let files: Vec<JsonFileReport> = reports
        .iter()
        .map(|(file, findings)| JsonFileReport {
            file: file.clone(),
            findings: findings.iter().map(finding_to_json).collect(),
        })
        .collect();

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        evm_version: evm.to_string(),
        total_findings: reports.iter().map(|(_, f)| f.len()).sum(),
        files,
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn finding_to_json(item: &ReportItem) -> JsonFinding {
    JsonFinding {
        task: item.origin.to_string(),
        severity: item.severity.to_string(),
        line: item.span.line,
        column: item.span.column,
        end_line: item.span.end_line,
        end_column: item.span.end_column,
        message: item.message.clone(),
    }
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write one unit's findings in pretty (human-readable) format.
pub fn write_pretty(path: &str, findings: &[ReportItem]) {
    println!();
    println!("======= {} =======", path);

    if findings.is_empty() {
        println!("  {}", "no findings".dimmed());
        return;
    }
    println!();

    for item in findings {
        write_severity_tag(item.severity);
        print!("  ");
        print!("{:<18}", item.origin.dimmed());
        print!("{}", item.file.blue());
        print!("{}", format!(":{}", item.span).dimmed());
        println!();

        // Message on next line, indented
        println!("           {}", item.message);
        println!();
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("  {} ", "ERROR".red()),
        Severity::Warning => print!("  {} ", "WARN ".yellow()),
        Severity::Info => print!("  {} ", "INFO ".blue()),
    }
}
