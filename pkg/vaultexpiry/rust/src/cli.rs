// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dd_vault_expiry::evaluator::DEFAULT_CONCURRENCY;
use dd_vault_expiry::vault::TlsVerify;
use dd_vault_expiry::{CredentialKind, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "vault-expiry-check",
    version,
    about = "Report Vault PKI certificates and tokens that are close to expiry"
)]
pub struct Args {
    /// YAML config file
    ///
    /// Defaults to $DD_VAULT_EXPIRY_CONFIG, then /etc/datadog-agent/vault_expiry.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level; DD_LOG_LEVEL and LOG_LEVEL take precedence
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Certificates issued by a PKI secrets engine
    Certs(CertsArgs),
    /// Tokens of the token auth backend
    Tokens(TokensArgs),
}

impl Command {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Command::Certs(_) => CredentialKind::Certificate,
            Command::Tokens(_) => CredentialKind::Token,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct CertsArgs {
    /// Warn when a certificate has this many days left or fewer
    #[arg(short, long, default_value_t = 10)]
    pub warn: i64,

    /// Critical when a certificate has this many days left or fewer
    #[arg(short, long, default_value_t = 5)]
    pub critical: i64,

    /// HTTP timeout in seconds, fractions allowed
    #[arg(short, long, default_value = "40", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// true, false, or the path of a PEM CA bundle
    #[arg(short, long, default_value = "true")]
    pub verify: TlsVerify,

    /// PKI mount, overrides vault_config.pki_engine
    #[arg(long)]
    pub pki_engine: Option<String>,

    /// Certificates fetched in parallel
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

#[derive(Debug, clap::Args)]
pub struct TokensArgs {
    /// Critical when a token has this many days left or fewer
    #[arg(short, long, default_value_t = 10)]
    pub critical: i64,

    /// Warn threshold; defaults to the critical one, which leaves only OK and CRITICAL
    #[arg(short, long)]
    pub warn: Option<i64>,

    /// HTTP timeout in seconds, fractions allowed
    #[arg(short, long, default_value = "30", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// true, false, or the path of a PEM CA bundle
    #[arg(short, long, default_value = "true")]
    pub verify: TlsVerify,

    /// Skip tokens whose display name starts with PREFIX (repeatable)
    #[arg(short, long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Accessors looked up in parallel
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("must be a positive number of seconds, got {s}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

impl CertsArgs {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl TokensArgs {
    pub fn warn_threshold(&self) -> i64 {
        self.warn.unwrap_or(self.critical)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
