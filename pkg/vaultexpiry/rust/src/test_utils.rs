// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-memory reader and fixed clock for evaluator tests
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::clock::FixedClock;
use crate::credential::{CredentialDescriptor, CredentialKind};
use crate::errors::{Error, Result};
use crate::reader::{CredentialReader, Exclusion, ReadOutcome};

pub const NOW: OffsetDateTime = datetime!(2026-10-16 12:00 UTC);

pub fn clock() -> FixedClock {
    FixedClock(NOW)
}

/// Get the base path for testdata files.
pub fn testdata_path() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir).join("testdata")
}

pub fn read_testdata(name: &str) -> String {
    std::fs::read_to_string(testdata_path().join(name)).unwrap()
}

struct FakeEntry {
    id: String,
    outcome: std::result::Result<ReadOutcome, String>,
    delay: StdDuration,
}

/// Reader backed by a fixed list of outcomes, in listing order.
pub struct FakeReader {
    kind: CredentialKind,
    entries: Vec<FakeEntry>,
    listing_fails: bool,
    list_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl FakeReader {
    pub fn new(kind: CredentialKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            listing_fails: false,
            list_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
        }
    }

    fn next_id(&self) -> String {
        format!("id-{}", self.entries.len())
    }

    fn push(mut self, outcome: std::result::Result<ReadOutcome, String>) -> Self {
        let id = self.next_id();
        self.entries.push(FakeEntry {
            id,
            outcome,
            delay: StdDuration::ZERO,
        });
        self
    }

    /// A credential expiring exactly `days` days after [`NOW`].
    pub fn expiring(self, name: &str, days: i64) -> Self {
        let descriptor = CredentialDescriptor::new(
            self.kind,
            self.next_id(),
            name,
            Some(NOW + Duration::days(days)),
        );
        self.push(Ok(ReadOutcome::Credential(descriptor)))
    }

    pub fn never_expiring(self, name: &str) -> Self {
        let descriptor = CredentialDescriptor::new(self.kind, self.next_id(), name, None);
        self.push(Ok(ReadOutcome::Credential(descriptor)))
    }

    pub fn ignored(self, prefix: &str) -> Self {
        let outcome = ReadOutcome::Excluded {
            id: self.next_id(),
            reason: Exclusion::IgnoredPrefix(prefix.to_string()),
        };
        self.push(Ok(outcome))
    }

    pub fn malformed(self, context: &str) -> Self {
        self.push(Err(context.to_string()))
    }

    /// Delay each read by the matching duration, in listing order.
    pub fn with_delays(mut self, delays_ms: &[u64]) -> Self {
        for (entry, ms) in self.entries.iter_mut().zip(delays_ms) {
            entry.delay = StdDuration::from_millis(*ms);
        }
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialReader for FakeReader {
    fn kind(&self) -> CredentialKind {
        self.kind
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_fails {
            return Err(Error::source_unavailable("connection refused"));
        }
        Ok(self.entries.iter().map(|e| e.id.clone()).collect())
    }

    async fn read(&self, id: &str) -> Result<ReadOutcome> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .unwrap_or_else(|| panic!("unknown id {id}"));
        if !entry.delay.is_zero() {
            tokio::time::sleep(entry.delay).await;
        }
        entry
            .outcome
            .clone()
            .map_err(|context| Error::malformed(id, context))
    }
}
