// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dd_vault_expiry::config::{self, Settings};
use dd_vault_expiry::render::{render_error, render_report};
use dd_vault_expiry::vault::{CertificateReader, IgnoreList, TokenReader, VaultClient};
use dd_vault_expiry::{
    CredentialKind, Evaluator, ScanReport, ServiceCheckStatus, SystemClock, Thresholds,
};
use log::{debug, error};

mod cli;

use cli::{Args, Command};

async fn scan(args: &Args, settings: Result<Settings>) -> Result<ScanReport> {
    let thresholds = match &args.command {
        Command::Certs(certs) => Thresholds::new(certs.warn, certs.critical)?,
        Command::Tokens(tokens) => Thresholds::new(tokens.warn_threshold(), tokens.critical)?,
    };
    let settings = settings?;
    let target = settings.vault_target()?;
    debug!("using Vault at {}", target.address);

    let report = match &args.command {
        Command::Certs(certs) => {
            let mount = settings.pki_mount(certs.pki_engine.as_deref())?;
            let client = VaultClient::new(&target, certs.timeout(), &certs.verify)?;
            let reader = CertificateReader::new(client, mount);
            Evaluator::new(thresholds)
                .with_concurrency(certs.concurrency)
                .evaluate(&reader, &SystemClock)
                .await
        }
        Command::Tokens(tokens) => {
            let client = VaultClient::new(&target, tokens.timeout(), &tokens.verify)?;
            let reader = TokenReader::new(client, IgnoreList::new(tokens.ignore.iter().cloned()));
            Evaluator::new(thresholds)
                .with_concurrency(tokens.concurrency)
                .evaluate(&reader, &SystemClock)
                .await
        }
    };
    report.context("scan failed")
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let kind: CredentialKind = args.command.kind();

    let path = config::config_path(args.config.as_deref());
    let settings = Settings::load(&path);
    let log_level = config::log_level(args.log_level.as_deref(), settings.as_ref().ok());
    let logger = simple_logger::init_with_level(log_level);
    debug!("Log level set to: {log_level:?}");

    let rendered = match logger.context("failed to initialize logger") {
        Err(e) => render_error(kind, &format!("{e:#}"), args.format),
        Ok(()) => match scan(&args, settings).await {
            Ok(report) => render_report(&report, args.format),
            Err(e) => {
                error!("{e:#}");
                render_error(kind, &format!("{e:#}"), args.format)
            }
        },
    };

    let (status, output) = rendered.unwrap_or_else(|e| {
        (
            ServiceCheckStatus::UNKNOWN,
            format!("{} UNKNOWN: failed to encode output: {e}", kind.check_name()),
        )
    });
    print_output(&output);
    ExitCode::from(status.exit_code())
}
