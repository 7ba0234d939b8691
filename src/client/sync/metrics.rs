//! # Sync Metrics
//!
//! Counters for the three sync activities. Failures are never surfaced to the
//! user, so these counters (and the logs) are the only record of them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct SyncMetrics {
    presence_reads: AtomicU64,
    presence_failures: AtomicU64,
    document_reads: AtomicU64,
    document_failures: AtomicU64,
    reconciliations: AtomicU64,
    reconcile_skips: AtomicU64,
    pushes: AtomicU64,
    push_failures: AtomicU64,
    serialize_failures: AtomicU64,
    last_push: Mutex<Option<DateTime<Utc>>>,
    last_reconcile: Mutex<Option<DateTime<Utc>>>,
}

/// Point-in-time copy of [`SyncMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub presence_reads: u64,
    pub presence_failures: u64,
    pub document_reads: u64,
    pub document_failures: u64,
    pub reconciliations: u64,
    pub reconcile_skips: u64,
    pub pushes: u64,
    pub push_failures: u64,
    pub serialize_failures: u64,
    /// RFC 3339 time of the last issued push
    pub last_push: Option<String>,
    /// RFC 3339 time of the last applied reconciliation
    pub last_reconcile: Option<String>,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

fn stamp(slot: &Mutex<Option<DateTime<Utc>>>) {
    *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(Utc::now());
}

fn read_stamp(slot: &Mutex<Option<DateTime<Utc>>>) -> Option<String> {
    let time = *slot.lock().unwrap_or_else(|p| p.into_inner());
    time.map(|time| time.to_rfc3339())
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_presence_read(&self) {
        bump(&self.presence_reads);
    }

    pub fn record_presence_failure(&self) {
        bump(&self.presence_failures);
    }

    pub fn record_document_read(&self) {
        bump(&self.document_reads);
    }

    pub fn record_document_failure(&self) {
        bump(&self.document_failures);
    }

    pub fn record_reconciliation(&self) {
        bump(&self.reconciliations);
        stamp(&self.last_reconcile);
    }

    pub fn record_reconcile_skip(&self) {
        bump(&self.reconcile_skips);
    }

    pub fn record_push(&self) {
        bump(&self.pushes);
        stamp(&self.last_push);
    }

    pub fn record_push_failure(&self) {
        bump(&self.push_failures);
    }

    pub fn record_serialize_failure(&self) {
        bump(&self.serialize_failures);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        MetricsSnapshot {
            presence_reads: load(&self.presence_reads),
            presence_failures: load(&self.presence_failures),
            document_reads: load(&self.document_reads),
            document_failures: load(&self.document_failures),
            reconciliations: load(&self.reconciliations),
            reconcile_skips: load(&self.reconcile_skips),
            pushes: load(&self.pushes),
            push_failures: load(&self.push_failures),
            serialize_failures: load(&self.serialize_failures),
            last_push: read_stamp(&self.last_push),
            last_reconcile: read_stamp(&self.last_reconcile),
        }
    }
}
