// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use time::OffsetDateTime;
use x509_parser::pem::parse_x509_pem;

use super::VaultClient;
use crate::credential::{CredentialDescriptor, CredentialKind};
use crate::errors::{Error, Result};
use crate::reader::{CredentialReader, ReadOutcome};

#[derive(Deserialize)]
struct CertificateData {
    certificate: String,
}

/// Certificates issued by one PKI secrets engine mount.
pub struct CertificateReader {
    client: VaultClient,
    mount: String,
}

impl CertificateReader {
    pub fn new(client: VaultClient, mount: impl Into<String>) -> Self {
        let mount: String = mount.into();
        Self {
            client,
            mount: mount.trim_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CredentialReader for CertificateReader {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Certificate
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        self.client
            .list_by_query(&format!("{}/certs", self.mount))
            .await
    }

    async fn read(&self, serial: &str) -> Result<ReadOutcome> {
        let data: CertificateData = self
            .client
            .read_data(
                serial,
                Method::GET,
                &format!("{}/cert/{serial}", self.mount),
                None,
            )
            .await?;
        certificate_descriptor(serial, &data.certificate).map(ReadOutcome::Credential)
    }
}

/// Decode a PEM certificate into a descriptor named after its subject CN.
///
/// The serial stands in for the name when the subject has no CN.
pub fn certificate_descriptor(serial: &str, pem: &str) -> Result<CredentialDescriptor> {
    let (_, pem) = parse_x509_pem(pem.as_bytes())
        .map_err(|e| Error::malformed(serial, format!("invalid PEM: {e}")))?;
    let cert = pem
        .parse_x509()
        .map_err(|e| Error::malformed(serial, format!("invalid certificate: {e}")))?;

    let not_after = cert.validity().not_after.timestamp();
    let expiry = OffsetDateTime::from_unix_timestamp(not_after)
        .map_err(|e| Error::malformed(serial, format!("notAfter out of range: {e}")))?;

    let name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::trim)
        .filter(|cn| !cn.is_empty())
        .unwrap_or(serial);

    Ok(CredentialDescriptor::new(
        CredentialKind::Certificate,
        serial,
        name,
        Some(expiry),
    ))
}
