/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::sync::{Arc, Mutex};

use cadence::MetricSink;

pub(crate) struct BufMetricSink {
    buf: Arc<Mutex<Vec<String>>>,
}

impl BufMetricSink {
    pub(crate) fn new(buf: Arc<Mutex<Vec<String>>>) -> Self {
        BufMetricSink { buf }
    }
}

impl MetricSink for BufMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        let mut buf = self.buf.lock().unwrap();
        buf.push(metric.to_string());
        Ok(metric.len())
    }
}

/// Reject every metric line containing `pattern`, keep the others.
pub(crate) struct FailingMetricSink {
    inner: BufMetricSink,
    pattern: &'static str,
}

impl FailingMetricSink {
    pub(crate) fn new(buf: Arc<Mutex<Vec<String>>>, pattern: &'static str) -> Self {
        FailingMetricSink {
            inner: BufMetricSink::new(buf),
            pattern,
        }
    }
}

impl MetricSink for FailingMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        if metric.contains(self.pattern) {
            Err(io::Error::other("statsd sink is down"))
        } else {
            self.inner.emit(metric)
        }
    }
}
