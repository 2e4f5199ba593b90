// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Configuration loading from YAML and the environment
//!
//! The file carries the Vault connection under `vault_config`:
//!
//! ```yaml
//! vault_config:
//!   api_address: https://vault.example:8200
//!   token: s.xxxxxxxx
//!   pki_engine: pki
//! log_level: info
//! ```
//!
//! `VAULT_ADDR` and `VAULT_TOKEN` override the file values.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/vault_expiry.yaml";
const CONFIG_PATH_ENV: &str = "DD_VAULT_EXPIRY_CONFIG";
const VAULT_ADDR_ENV: &str = "VAULT_ADDR";
const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";
const DEFAULT_LOG_LEVEL: log::Level = log::Level::Warn;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub vault_config: VaultConfig,

    #[serde(default)]
    pub log_level: Option<String>,
}

/// Vault connection settings as written in the file
#[derive(Debug, Default, Clone, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub api_address: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// Mount path of the PKI secrets engine
    #[serde(default)]
    pub pki_engine: Option<String>,
}

/// Validated address and token of the Vault server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultTarget {
    /// Base URL without a trailing slash
    pub address: String,
    pub token: String,
}

/// Pick the config file: flag, then `DD_VAULT_EXPIRY_CONFIG`, then the default path.
pub fn config_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    non_empty_env(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Settings {
    /// Load `path` and apply the environment overrides.
    ///
    /// A missing file is accepted when both `VAULT_ADDR` and `VAULT_TOKEN` are set.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = match fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound && env_provides_credentials() => {
                debug!(
                    "config file {} not found, using {VAULT_ADDR_ENV} and {VAULT_TOKEN_ENV}",
                    path.display()
                );
                Self::default()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config file {}", path.display()));
            }
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(addr) = non_empty_env(VAULT_ADDR_ENV) {
            self.vault_config.api_address = Some(addr);
        }
        if let Some(token) = non_empty_env(VAULT_TOKEN_ENV) {
            self.vault_config.token = Some(token);
        }
    }

    /// Address and token, both required.
    pub fn vault_target(&self) -> Result<VaultTarget> {
        let address = self
            .vault_config
            .api_address
            .as_deref()
            .map(|a| a.trim().trim_end_matches('/'))
            .filter(|a| !a.is_empty());
        let Some(address) = address else {
            bail!("vault_config.api_address is not set (or set {VAULT_ADDR_ENV})");
        };

        let token = self
            .vault_config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let Some(token) = token else {
            bail!("vault_config.token is not set (or set {VAULT_TOKEN_ENV})");
        };

        Ok(VaultTarget {
            address: address.to_string(),
            token: token.to_string(),
        })
    }

    /// PKI mount for the certificate pipeline. `flag` wins over the file.
    pub fn pki_mount(&self, flag: Option<&str>) -> Result<String> {
        let mount = flag
            .or(self.vault_config.pki_engine.as_deref())
            .map(|m| m.trim().trim_matches('/'))
            .filter(|m| !m.is_empty());
        match mount {
            Some(mount) => Ok(mount.to_string()),
            None => bail!("no PKI mount configured: set vault_config.pki_engine or --pki-engine"),
        }
    }
}

/// Parse a Go log level string into a log::Level
/// Unknown levels fall back to Warn
fn parse_log_level(level: &str) -> log::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" => log::Level::Error,
        "off" => log::Level::Error, // log has no "off" level
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Gets the log level.
/// Priority: DD_LOG_LEVEL > LOG_LEVEL > flag > YAML config > default Warn
pub fn log_level(flag: Option<&str>, settings: Option<&Settings>) -> log::Level {
    if let Some(level) = non_empty_env("DD_LOG_LEVEL") {
        return parse_log_level(&level);
    }

    if let Some(level) = non_empty_env("LOG_LEVEL") {
        return parse_log_level(&level);
    }

    if let Some(level) = flag {
        return parse_log_level(level);
    }

    settings
        .and_then(|s| s.log_level.as_deref())
        .map(parse_log_level)
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_provides_credentials() -> bool {
    non_empty_env(VAULT_ADDR_ENV).is_some() && non_empty_env(VAULT_TOKEN_ENV).is_some()
}
