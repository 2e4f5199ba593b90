// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::{Iso8601, Rfc3339};

use super::VaultClient;
use crate::credential::{CredentialDescriptor, CredentialKind};
use crate::errors::{Error, Result};
use crate::reader::{CredentialReader, Exclusion, ReadOutcome};

const ACCESSORS_PATH: &str = "auth/token/accessors";
const LOOKUP_ACCESSOR_PATH: &str = "auth/token/lookup-accessor";
const GENERIC_TOKEN_NAME: &str = "token";
const ACCESSOR_SUFFIX_LEN: usize = 7;

/// Display-name prefixes whose tokens are never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList(Vec<String>);

impl IgnoreList {
    /// Empty prefixes are dropped; they would match every token.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    pub fn matching_prefix(&self, display_name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| display_name.starts_with(p.as_str()))
            .map(String::as_str)
    }
}

/// `data` of a lookup-accessor response. Vault sends many more fields.
#[derive(Debug, Default, Deserialize)]
pub struct TokenLookup {
    #[serde(default)]
    pub accessor: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub expire_time: Option<String>,
}

/// Tokens of the token auth backend, read through their accessors.
pub struct TokenReader {
    client: VaultClient,
    ignore: IgnoreList,
}

impl TokenReader {
    pub fn new(client: VaultClient, ignore: IgnoreList) -> Self {
        Self { client, ignore }
    }
}

#[async_trait]
impl CredentialReader for TokenReader {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Token
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        self.client.list(ACCESSORS_PATH).await
    }

    async fn read(&self, accessor: &str) -> Result<ReadOutcome> {
        let body = json!({ "accessor": accessor });
        let lookup: TokenLookup = self
            .client
            .read_data(accessor, Method::POST, LOOKUP_ACCESSOR_PATH, Some(&body))
            .await?;
        token_outcome(accessor, lookup, &self.ignore)
    }
}

/// Turn a lookup into a descriptor, or an exclusion when the name is ignored.
///
/// A null or empty `expire_time` yields a descriptor without expiry.
pub fn token_outcome(
    listed: &str,
    lookup: TokenLookup,
    ignore: &IgnoreList,
) -> Result<ReadOutcome> {
    let accessor = lookup
        .accessor
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| listed.to_string());
    let raw_name = lookup.display_name.unwrap_or_default();

    if let Some(prefix) = ignore.matching_prefix(raw_name.trim()) {
        return Ok(ReadOutcome::Excluded {
            id: accessor,
            reason: Exclusion::IgnoredPrefix(prefix.to_string()),
        });
    }

    let expiry = match lookup.expire_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_expire_time(raw).ok_or_else(|| {
            Error::malformed(listed, format!("unparseable expire_time '{raw}'"))
        })?),
    };

    let name = token_display_name(&raw_name, &accessor);
    Ok(ReadOutcome::Credential(CredentialDescriptor::new(
        CredentialKind::Token,
        accessor,
        name,
        expiry,
    )))
}

/// RFC 3339 first, then the broader ISO 8601 forms.
pub fn parse_expire_time(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .ok()
}

/// Unnamed tokens get the head of their accessor appended so they can be told apart.
fn token_display_name(raw: &str, accessor: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(GENERIC_TOKEN_NAME) {
        let suffix: String = accessor.chars().take(ACCESSOR_SUFFIX_LEN).collect();
        format!("{GENERIC_TOKEN_NAME}-{suffix}")
    } else {
        trimmed.to_string()
    }
}
