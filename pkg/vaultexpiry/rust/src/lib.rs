// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Expiry audit for credentials issued by HashiCorp Vault.
//!
//! Two pipelines share one evaluation engine: PKI certificates listed from a
//! PKI mount, and token accessors listed from the token auth backend. Each
//! scan captures a single evaluation instant, classifies every credential
//! with an expiry into a [`SeverityTier`], and aggregates the result into a
//! [`ScanReport`] that the binary renders as a service check.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod classifier;
pub mod clock;
pub mod config;
pub mod credential;
mod errors;
pub mod evaluator;
pub mod reader;
pub mod render;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the public API
pub use classifier::{SeverityTier, Thresholds, classify};
pub use clock::{FixedClock, SystemClock, TimeSource};
pub use credential::{CredentialDescriptor, CredentialKind, days_remaining};
pub use errors::{Error, Result};
pub use evaluator::{Evaluator, Finding, ScanReport, SkippedItem, evaluate};
pub use reader::{CredentialReader, Exclusion, ReadOutcome};
pub use render::{OutputFormat, ServiceCheckStatus};
