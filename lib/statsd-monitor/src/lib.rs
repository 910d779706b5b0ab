/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::{MonitorError, MonitorResult, StatsdClientBuildError};

mod config;
pub use config::{DEFAULT_STATSD_HOST, DEFAULT_STATSD_PORT, StatsdBackend, StatsdClientConfig};

mod tag;
pub use tag::{CustomTags, build_tags};

mod monitor;
pub use monitor::{MonitorStatsd, StatsdMonitor};

#[cfg(any(test, feature = "test-util"))]
mod recorder;
#[cfg(any(test, feature = "test-util"))]
pub use recorder::{RecordedMetric, RecordedValue, RecordingMonitor};

#[cfg(test)]
mod sink;
