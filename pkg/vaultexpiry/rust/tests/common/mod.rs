// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-process mock of the Vault endpoints the readers call
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dd_vault_expiry::config::VaultTarget;
use dd_vault_expiry::vault::{TlsVerify, VaultClient};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "s.test-token";
pub const PKI_MOUNT: &str = "pki";

pub fn read_testdata(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

/// What the mock serves. Listing order is insertion order.
#[derive(Default)]
pub struct MockVault {
    certs: Vec<(String, String)>,
    tokens: Vec<(String, Value)>,
    listing_status: Option<StatusCode>,
    detail_requests: AtomicUsize,
}

impl MockVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cert(mut self, serial: &str, pem: String) -> Self {
        self.certs.push((serial.to_string(), pem));
        self
    }

    /// A token whose lookup returns `data`.
    pub fn token(mut self, accessor: &str, data: Value) -> Self {
        self.tokens.push((accessor.to_string(), data));
        self
    }

    /// Listed but unknown to lookup-accessor.
    pub fn dangling_accessor(mut self, accessor: &str) -> Self {
        self.tokens.push((accessor.to_string(), Value::Null));
        self
    }

    pub fn failing_listing(mut self, status: StatusCode) -> Self {
        self.listing_status = Some(status);
        self
    }

    pub fn detail_requests(&self) -> usize {
        self.detail_requests.load(Ordering::SeqCst)
    }

    fn list(&self, keys: Vec<String>) -> Response<Full<Bytes>> {
        if let Some(status) = self.listing_status {
            return reply(status, json!({ "errors": ["internal error"] }));
        }
        if keys.is_empty() {
            return reply(StatusCode::NOT_FOUND, json!({ "errors": [] }));
        }
        reply(StatusCode::OK, json!({ "data": { "keys": keys } }))
    }

    fn cert_detail(&self, serial: &str) -> Response<Full<Bytes>> {
        self.detail_requests.fetch_add(1, Ordering::SeqCst);
        match self.certs.iter().find(|(s, _)| s == serial) {
            Some((_, pem)) => reply(StatusCode::OK, json!({ "data": { "certificate": pem } })),
            None => reply(StatusCode::NOT_FOUND, json!({ "errors": [] })),
        }
    }

    fn lookup_accessor(&self, body: &[u8]) -> Response<Full<Bytes>> {
        self.detail_requests.fetch_add(1, Ordering::SeqCst);
        let accessor = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| v.get("accessor").and_then(Value::as_str).map(str::to_string));
        let data = accessor.and_then(|accessor| {
            self.tokens
                .iter()
                .find(|(a, data)| *a == accessor && !data.is_null())
                .map(|(_, data)| data.clone())
        });
        match data {
            Some(data) => reply(StatusCode::OK, json!({ "data": data })),
            None => reply(
                StatusCode::BAD_REQUEST,
                json!({ "errors": ["invalid accessor"] }),
            ),
        }
    }
}

fn reply(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn handle(
    vault: Arc<MockVault>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let authorized = req
        .headers()
        .get("X-Vault-Token")
        .and_then(|v| v.to_str().ok())
        == Some(TOKEN);
    if !authorized {
        return Ok(reply(
            StatusCode::FORBIDDEN,
            json!({ "errors": ["permission denied"] }),
        ));
    }

    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();

    let certs_path = format!("/v1/{PKI_MOUNT}/certs");
    let cert_prefix = format!("/v1/{PKI_MOUNT}/cert/");

    let response = match method.as_str() {
        "GET" if path == certs_path && query == "list=true" => {
            vault.list(vault.certs.iter().map(|(s, _)| s.clone()).collect())
        }
        "GET" if path.starts_with(&cert_prefix) => {
            let serial = path.trim_start_matches(&cert_prefix);
            vault.cert_detail(serial)
        }
        "LIST" if path == "/v1/auth/token/accessors" => {
            vault.list(vault.tokens.iter().map(|(a, _)| a.clone()).collect())
        }
        "POST" if path == "/v1/auth/token/lookup-accessor" => vault.lookup_accessor(&body),
        _ => {
            let route = path.trim_start_matches("/v1/");
            let error = format!("no handler for route \"{route}\". route entry not found.");
            reply(StatusCode::NOT_FOUND, json!({ "errors": [error] }))
        }
    };
    Ok(response)
}

/// Serve `vault` on an ephemeral port. Returns the shared state and the base URL.
pub async fn serve(vault: MockVault) -> (Arc<MockVault>, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let vault = Arc::new(vault);

    let state = vault.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let state = state.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| handle(state.clone(), req));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (vault, format!("http://{addr}"))
}

pub fn client(address: &str, token: &str) -> VaultClient {
    let target = VaultTarget {
        address: address.to_string(),
        token: token.to_string(),
    };
    VaultClient::new(&target, Duration::from_secs(5), &TlsVerify::Enabled).unwrap()
}
