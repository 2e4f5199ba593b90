// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Vault HTTP transport shared by the certificate and token readers.

use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::VaultTarget;
use crate::errors::{Error, Result};

pub mod certs;
pub mod tokens;

pub use certs::CertificateReader;
pub use tokens::{IgnoreList, TokenReader};

/// Server certificate verification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsVerify {
    #[default]
    Enabled,
    Disabled,
    /// Trust the PEM bundle at this path in addition to the system roots.
    CaBundle(PathBuf),
}

impl FromStr for TlsVerify {
    type Err = Infallible;

    /// `true`/`false` in any case, anything else is a CA bundle path.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "true" => Self::Enabled,
            "false" => Self::Disabled,
            _ => Self::CaBundle(PathBuf::from(s.trim())),
        })
    }
}

#[derive(Deserialize)]
struct VaultResponse<T> {
    data: T,
}

#[derive(Deserialize)]
struct KeyListData {
    keys: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ErrorsBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Vault answers an empty listing with `404 {"errors":[]}`. A 404 that carries
/// errors is an unknown mount or route.
fn is_empty_listing(body: &str) -> bool {
    body.trim().is_empty()
        || serde_json::from_str::<ErrorsBody>(body).is_ok_and(|b| b.errors.is_empty())
}

/// Authenticated client for one Vault server.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    address: String,
    token: String,
}

impl VaultClient {
    pub fn new(
        target: &VaultTarget,
        timeout: Duration,
        verify: &TlsVerify,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        match verify {
            TlsVerify::Enabled => {}
            TlsVerify::Disabled => builder = builder.danger_accept_invalid_certs(true),
            TlsVerify::CaBundle(path) => {
                let pem = fs::read(path)
                    .with_context(|| format!("failed to read CA bundle {}", path.display()))?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .with_context(|| format!("failed to parse CA bundle {}", path.display()))?;
                builder = builder.add_root_certificate(cert);
            }
        }
        let http = builder.build().context("failed to build Vault HTTP client")?;

        Ok(Self {
            http,
            address: target.address.trim_end_matches('/').to_string(),
            token: target.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.address, path.trim_start_matches('/'));
        self.http
            .request(method, url)
            .header("X-Vault-Token", &self.token)
            .header("Content-Type", "application/json")
    }

    /// `LIST` the keys under `path`. A 404 without errors is an empty list.
    pub(crate) async fn list(&self, path: &str) -> Result<Vec<String>> {
        let method = Method::from_bytes(b"LIST")
            .map_err(|e| Error::source_unavailable(format!("invalid LIST method: {e}")))?;
        self.list_with(self.request(method, path), path).await
    }

    /// `GET ...?list=true`, the form the PKI engine documents for listing.
    pub(crate) async fn list_by_query(&self, path: &str) -> Result<Vec<String>> {
        let request = self.request(Method::GET, path).query(&[("list", "true")]);
        self.list_with(request, path).await
    }

    async fn list_with(&self, request: RequestBuilder, path: &str) -> Result<Vec<String>> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::source_unavailable(format!("listing {path} failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                let body = response.text().await.unwrap_or_default();
                if is_empty_listing(&body) {
                    Ok(Vec::new())
                } else {
                    Err(Error::source_unavailable(format!(
                        "listing {path} failed: {} {body}",
                        StatusCode::NOT_FOUND
                    )))
                }
            }
            status if status.is_success() => {
                let body = response.text().await.map_err(|e| {
                    Error::source_unavailable(format!("reading {path} listing failed: {e}"))
                })?;
                let list: VaultResponse<KeyListData> =
                    serde_json::from_str(&body).map_err(|e| {
                        Error::source_unavailable(format!(
                            "failed to decode {path} listing: {e}; body={body}"
                        ))
                    })?;
                Ok(list.data.keys.unwrap_or_default())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::source_unavailable(format!(
                    "listing {path} failed: {status} {body}"
                )))
            }
        }
    }

    /// Fetch the `data` object of one item. Any failure is scoped to `id`.
    pub(crate) async fn read_data<T: DeserializeOwned>(
        &self,
        id: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::malformed(id, format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::malformed(id, format!("reading response failed: {e}")))?;
        if !status.is_success() {
            return Err(Error::malformed(id, format!("{status} {body}")));
        }

        let decoded: VaultResponse<T> = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(id, format!("failed to decode response: {e}")))?;
        Ok(decoded.data)
    }
}
