// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Scan orchestration: list, read, classify, aggregate.

use futures::{StreamExt, stream};
use log::{debug, info, warn};
use serde::Serialize;

use crate::classifier::{SeverityTier, Thresholds};
use crate::clock::TimeSource;
use crate::credential::{CredentialKind, days_remaining};
use crate::errors::Result;
use crate::reader::{CredentialReader, Exclusion, ReadOutcome};

/// Detail fetches in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// One over-threshold credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub name: String,
    pub days_remaining: i64,
    pub tier: SeverityTier,
}

/// A listed id whose detail could not be read or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub kind: CredentialKind,
    pub verdict: SeverityTier,
    /// Findings of the verdict tier only, in listing order. Empty when OK.
    pub findings: Vec<Finding>,
    /// Credentials that were classified, whatever their tier.
    pub evaluated: usize,
    /// Credentials left out because they never expire or are ignored.
    pub excluded: usize,
    /// WARN findings hidden because CRITICAL ones exist.
    pub suppressed: usize,
    pub skipped: Vec<SkippedItem>,
}

impl ScanReport {
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_all_clear(&self) -> bool {
        self.verdict == SeverityTier::Ok
    }
}

/// Runs scans for a fixed pair of thresholds.
#[derive(Debug, Clone)]
pub struct Evaluator {
    thresholds: Thresholds,
    concurrency: usize,
}

impl Evaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bound on concurrent detail fetches. `1` reads strictly one at a time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Scan every credential `reader` lists.
    ///
    /// The evaluation instant is read once, before the listing. A listing
    /// failure is returned as is; a failed read is recorded in
    /// [`ScanReport::skipped`] and the scan goes on. Results are consumed in
    /// listing order whatever order the reads complete in.
    pub async fn evaluate<R, C>(&self, reader: &R, clock: &C) -> Result<ScanReport>
    where
        R: CredentialReader + ?Sized,
        C: TimeSource + ?Sized,
    {
        let kind = reader.kind();
        let now = clock.now();

        let ids = reader.list_ids().await?;
        debug!("listed {} {kind} id(s)", ids.len());

        let mut reads = stream::iter(ids)
            .map(move |id| async move {
                let outcome = reader.read(&id).await;
                (id, outcome)
            })
            .buffered(self.concurrency);

        let mut classified = Vec::new();
        let mut excluded = 0;
        let mut skipped = Vec::new();

        while let Some((id, outcome)) = reads.next().await {
            match outcome {
                Ok(ReadOutcome::Credential(descriptor)) => {
                    let Some(expiry) = descriptor.expiry() else {
                        debug!("excluding {kind} {id}: {}", Exclusion::NeverExpires);
                        excluded += 1;
                        continue;
                    };
                    let days = days_remaining(expiry, now);
                    let tier = self.thresholds.classify(days);
                    debug!(
                        "{kind} {id} ({}) has {days} day(s) left: {tier}",
                        descriptor.display_name()
                    );
                    classified.push(Finding {
                        name: descriptor.display_name().to_string(),
                        days_remaining: days,
                        tier,
                    });
                }
                Ok(ReadOutcome::Excluded { reason, .. }) => {
                    debug!("excluding {kind} {id}: {reason}");
                    excluded += 1;
                }
                Err(e) => {
                    warn!("skipping {kind} {id}: {e}");
                    skipped.push(SkippedItem {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let evaluated = classified.len();
        let (verdict, findings, suppressed) = aggregate(classified);
        info!(
            "{kind} scan: verdict {verdict}, {evaluated} evaluated, \
             {excluded} excluded, {} skipped",
            skipped.len()
        );

        Ok(ScanReport {
            kind,
            verdict,
            findings,
            evaluated,
            excluded,
            suppressed,
            skipped,
        })
    }
}

/// Validate the thresholds, then scan with the default concurrency.
///
/// Invalid thresholds fail before `reader` is touched.
pub async fn evaluate<R, C>(
    reader: &R,
    clock: &C,
    warn_threshold: i64,
    critical_threshold: i64,
) -> Result<ScanReport>
where
    R: CredentialReader + ?Sized,
    C: TimeSource + ?Sized,
{
    let thresholds = Thresholds::new(warn_threshold, critical_threshold)?;
    Evaluator::new(thresholds).evaluate(reader, clock).await
}

/// Keep only the findings of the highest tier. Returns the verdict, those
/// findings, and how many WARN findings a CRITICAL verdict hid.
fn aggregate(classified: Vec<Finding>) -> (SeverityTier, Vec<Finding>, usize) {
    let verdict = classified
        .iter()
        .map(|f| f.tier)
        .max()
        .unwrap_or_default();

    if verdict == SeverityTier::Ok {
        return (verdict, Vec::new(), 0);
    }

    let suppressed = if verdict == SeverityTier::Critical {
        classified
            .iter()
            .filter(|f| f.tier == SeverityTier::Warn)
            .count()
    } else {
        0
    };
    let findings = classified
        .into_iter()
        .filter(|f| f.tier == verdict)
        .collect();

    (verdict, findings, suppressed)
}
