// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Threshold classification of remaining validity.

use serde::Serialize;

use crate::errors::{Error, Result};

/// Severity of a single credential, and of a whole scan.
///
/// Variants are declared in ascending order so that the derived `Ord` gives
/// `Ok < Warn < Critical` and the scan verdict is a plain `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    #[default]
    Ok,
    Warn,
    Critical,
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warn => write!(f, "WARN"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A validated warn/critical pair, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    warn: i64,
    critical: i64,
}

impl Thresholds {
    /// Fails with [`Error::InvalidThresholds`] when `warn < critical`.
    pub fn new(warn: i64, critical: i64) -> Result<Self> {
        if warn < critical {
            return Err(Error::InvalidThresholds { warn, critical });
        }
        Ok(Self { warn, critical })
    }

    pub fn warn(&self) -> i64 {
        self.warn
    }

    pub fn critical(&self) -> i64 {
        self.critical
    }

    /// Boundary equality resolves to the more severe tier.
    pub fn classify(&self, days_remaining: i64) -> SeverityTier {
        if days_remaining <= self.critical {
            SeverityTier::Critical
        } else if days_remaining <= self.warn {
            SeverityTier::Warn
        } else {
            SeverityTier::Ok
        }
    }
}

/// Classify `days_remaining` against a raw threshold pair.
pub fn classify(
    days_remaining: i64,
    warn_threshold: i64,
    critical_threshold: i64,
) -> Result<SeverityTier> {
    Thresholds::new(warn_threshold, critical_threshold).map(|t| t.classify(days_remaining))
}
