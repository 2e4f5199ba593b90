// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! CredentialReader port
//! Interface between the evaluator and a source of credentials

use async_trait::async_trait;

use crate::credential::{CredentialDescriptor, CredentialKind};
use crate::errors::Result;

/// Why a credential was left out of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// The credential has no expiry (root tokens, for instance).
    NeverExpires,
    /// The display name starts with a configured ignore prefix.
    IgnoredPrefix(String),
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverExpires => write!(f, "never expires"),
            Self::IgnoredPrefix(prefix) => write!(f, "ignored prefix '{prefix}'"),
        }
    }
}

/// Result of reading one listed id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Credential(CredentialDescriptor),
    Excluded { id: String, reason: Exclusion },
}

/// Port for enumerating and reading credentials of one kind
#[async_trait]
pub trait CredentialReader: Send + Sync {
    fn kind(&self) -> CredentialKind;

    /// List every active credential id.
    /// Fails with `SourceUnavailable`, which aborts the scan.
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Fetch and decode a single credential.
    /// Fails with `MalformedItem`, which only skips this id.
    async fn read(&self, id: &str) -> Result<ReadOutcome>;
}
