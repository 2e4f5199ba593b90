// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Service check output for a scan.

use std::fmt::Display;

use clap::ValueEnum;
use serde::Serialize;

use crate::classifier::SeverityTier;
use crate::credential::CredentialKind;
use crate::evaluator::{Finding, ScanReport};

/// Replica of the Agent service check status
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceCheckStatus {
    OK = 0,
    WARNING = 1,
    CRITICAL = 2,
    UNKNOWN = 3,
}

impl ServiceCheckStatus {
    /// Process exit code of the plugin.
    pub fn exit_code(self) -> u8 {
        self as u8
    }
}

impl From<SeverityTier> for ServiceCheckStatus {
    fn from(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Ok => Self::OK,
            SeverityTier::Warn => Self::WARNING,
            SeverityTier::Critical => Self::CRITICAL,
        }
    }
}

impl std::fmt::Display for ServiceCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OK => "OK",
            Self::WARNING => "WARNING",
            Self::CRITICAL => "CRITICAL",
            Self::UNKNOWN => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    check: &'static str,
    status: ServiceCheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ScanReport>,
}

/// Render a completed scan. The caller exits with `status.exit_code()`.
pub fn render_report(
    report: &ScanReport,
    format: OutputFormat,
) -> serde_json::Result<(ServiceCheckStatus, String)> {
    let status = ServiceCheckStatus::from(report.verdict);
    let check = report.kind.check_name();
    let message = report_message(report);

    let output = match format {
        OutputFormat::Text => format!("{check} {status}: {message}"),
        OutputFormat::Json => serde_json::to_string(&JsonOutput {
            check,
            status,
            message,
            report: Some(report),
        })?,
    };
    Ok((status, output))
}

/// Render a scan that could not complete. Always UNKNOWN.
pub fn render_error(
    kind: CredentialKind,
    error: &dyn Display,
    format: OutputFormat,
) -> serde_json::Result<(ServiceCheckStatus, String)> {
    let status = ServiceCheckStatus::UNKNOWN;
    let check = kind.check_name();

    let output = match format {
        OutputFormat::Text => format!("{check} {status}: {error}"),
        OutputFormat::Json => serde_json::to_string(&JsonOutput {
            check,
            status,
            message: error.to_string(),
            report: None,
        })?,
    };
    Ok((status, output))
}

fn report_message(report: &ScanReport) -> String {
    let mut lines: Vec<String> = if report.findings.is_empty() {
        let all_clear = match report.kind {
            CredentialKind::Certificate => "All certs are good!",
            CredentialKind::Token => "All tokens are good!",
        };
        vec![all_clear.to_string()]
    } else {
        report
            .findings
            .iter()
            .map(|f| finding_line(report.kind, f))
            .collect()
    };

    if !report.skipped.is_empty() {
        lines.push(format!("{} item(s) could not be read", report.skipped.len()));
    }
    lines.join("\n")
}

fn finding_line(kind: CredentialKind, finding: &Finding) -> String {
    let unit = match kind {
        CredentialKind::Certificate => "days",
        CredentialKind::Token => "day(s)",
    };
    let days = finding.days_remaining;
    if days < 0 {
        format!("{} expired {} {unit} ago,", finding.name, days.unsigned_abs())
    } else {
        format!("{} expiring in {days} {unit},", finding.name)
    }
}
