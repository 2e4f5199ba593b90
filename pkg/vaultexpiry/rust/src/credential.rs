// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use serde::Serialize;
use time::OffsetDateTime;

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Kind of credential a pipeline audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Certificate,
    Token,
}

impl CredentialKind {
    /// Service check name reported for this pipeline.
    pub fn check_name(&self) -> &'static str {
        match self {
            Self::Certificate => "vault_cert_expire",
            Self::Token => "vault_token_expire",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Certificate => write!(f, "certificate"),
            Self::Token => write!(f, "token"),
        }
    }
}

/// One credential as read from Vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor {
    id: String,
    display_name: String,
    expiry: Option<OffsetDateTime>,
    kind: CredentialKind,
}

impl CredentialDescriptor {
    pub fn new(
        kind: CredentialKind,
        id: impl Into<String>,
        display_name: impl Into<String>,
        expiry: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            expiry,
            kind,
        }
    }

    /// Certificate serial or token accessor.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// `None` means the credential never expires.
    pub fn expiry(&self) -> Option<OffsetDateTime> {
        self.expiry
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }
}

/// Whole days between `now` and `expiry`, rounded towards negative infinity.
///
/// A credential that expired one second ago has `-1` days left, not `0`.
pub fn days_remaining(expiry: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (expiry - now).whole_seconds().div_euclid(SECONDS_PER_DAY)
}
