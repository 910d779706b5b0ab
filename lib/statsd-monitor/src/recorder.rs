/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::iter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use cadence::{ErrorKind, MetricError};

use crate::{CustomTags, MonitorError, MonitorResult, MonitorStatsd, build_tags};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedValue {
    Timing(Duration),
    Count(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedMetric {
    pub name: String,
    pub value: RecordedValue,
    pub tags: Vec<String>,
}

/// An in-memory [`MonitorStatsd`] for use in tests.
///
/// Every successful emission is kept in call order. Timing or counter
/// emissions can be made to fail, in which case nothing is recorded for them.
#[derive(Default)]
pub struct RecordingMonitor {
    records: Mutex<Vec<RecordedMetric>>,
    fail_timing: AtomicBool,
    fail_count: AtomicBool,
}

impl RecordingMonitor {
    pub fn new() -> Self {
        RecordingMonitor::default()
    }

    pub fn set_fail_timing(&self, fail: bool) {
        self.fail_timing.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::Relaxed);
    }

    pub fn records(&self) -> Vec<RecordedMetric> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedMetric>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record<'a, I>(&self, name: &str, value: RecordedValue, tags: I) -> MonitorResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fail = match value {
            RecordedValue::Timing(_) => &self.fail_timing,
            RecordedValue::Count(_) => &self.fail_count,
        };
        if fail.load(Ordering::Relaxed) {
            return Err(MonitorError::Emit(MetricError::from((
                ErrorKind::IoError,
                "emission failure injected",
            ))));
        }

        self.lock().push(RecordedMetric {
            name: name.to_string(),
            value,
            tags: tags.into_iter().map(str::to_string).collect(),
        });
        Ok(())
    }
}

impl MonitorStatsd for RecordingMonitor {
    fn monitor_latency(&self, name: &str, group: &str, latency: Duration) -> MonitorResult<()> {
        self.record(name, RecordedValue::Timing(latency), iter::once(group))
    }

    fn monitor_counter(&self, name: &str, group: &str, _status: u16) -> MonitorResult<()> {
        self.record(name, RecordedValue::Count(1), iter::once(group))
    }

    fn custom_monitor_counter(
        &self,
        name: &str,
        group: &str,
        tags: &CustomTags,
    ) -> MonitorResult<()> {
        let statsd_tags = build_tags(group, tags);
        self.record(
            name,
            RecordedValue::Count(1),
            statsd_tags.iter().map(String::as_str),
        )
    }

    fn custom_monitor_latency(
        &self,
        name: &str,
        group: &str,
        tags: &CustomTags,
        latency: Duration,
    ) -> MonitorResult<()> {
        let statsd_tags = build_tags(group, tags);
        self.record(
            name,
            RecordedValue::Timing(latency),
            statsd_tags.iter().map(String::as_str),
        )
    }
}
