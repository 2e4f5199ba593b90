// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The listing step failed. Scan-fatal.
    #[error("credential source unavailable: {context}")]
    SourceUnavailable { context: String },

    /// A single detail fetch or parse failed. The scan records it and moves on.
    #[error("malformed item {id}: {context}")]
    MalformedItem { id: String, context: String },

    #[error(
        "invalid thresholds: warn ({warn}) must be greater than or equal to critical ({critical})"
    )]
    InvalidThresholds { warn: i64, critical: i64 },
}

impl Error {
    pub(crate) fn source_unavailable(context: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            context: context.into(),
        }
    }

    pub(crate) fn malformed(id: &str, context: impl Into<String>) -> Self {
        Error::MalformedItem {
            id: id.to_string(),
            context: context.into(),
        }
    }
}
