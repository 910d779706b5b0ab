/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::iter;
use std::time::Duration;

use cadence::StatsdClient;
use cadence::prelude::*;
use log::debug;

use crate::{
    CustomTags, MonitorResult, StatsdBackend, StatsdClientBuildError, StatsdClientConfig,
    build_tags,
};

/// Latency and counter monitoring, one metric line per emission.
///
/// Every metric is tagged with a group name, such as `REDIS` or `API-OUT`,
/// which is sent as a bare tag value. The custom variants append one
/// `key:value` tag per map entry after the group tag.
pub trait MonitorStatsd: Send + Sync {
    /// Send a timing sample for `name`.
    ///
    /// The latency is sent in whole milliseconds, rounded down, so anything
    /// below 1ms is sent as `0|ms`.
    fn monitor_latency(&self, name: &str, group: &str, latency: Duration) -> MonitorResult<()>;

    /// Send a counter increment of 1 for `name`.
    ///
    /// The status code is not sent. Callers that need it in the metric
    /// should use [`MonitorStatsd::custom_monitor_counter`] with a status tag,
    /// as adding it here would change the tag cardinality of existing metrics.
    fn monitor_counter(&self, name: &str, group: &str, status: u16) -> MonitorResult<()>;

    /// Send the latency and then the counter.
    ///
    /// The counter is skipped if the latency could not be sent.
    fn monitor_summary(
        &self,
        name: &str,
        group: &str,
        status: u16,
        latency: Duration,
    ) -> MonitorResult<()> {
        self.monitor_latency(name, group, latency)?;
        self.monitor_counter(name, group, status)
    }

    fn custom_monitor_counter(&self, name: &str, group: &str, tags: &CustomTags)
    -> MonitorResult<()>;

    fn custom_monitor_latency(
        &self,
        name: &str,
        group: &str,
        tags: &CustomTags,
        latency: Duration,
    ) -> MonitorResult<()>;

    /// Send the custom latency and then the custom counter.
    ///
    /// The counter is skipped if the latency could not be sent.
    fn custom_monitor_summary(
        &self,
        name: &str,
        group: &str,
        latency: Duration,
        tags: &CustomTags,
    ) -> MonitorResult<()> {
        self.custom_monitor_latency(name, group, tags, latency)?;
        self.custom_monitor_counter(name, group, tags)
    }
}

pub struct StatsdMonitor {
    backend: StatsdBackend,
    client: StatsdClient,
}

impl StatsdMonitor {
    /// Create a monitor sending to `host:port` over udp.
    pub fn new(host: &str, port: u16) -> Result<Self, StatsdClientBuildError> {
        let mut config = StatsdClientConfig::default();
        config.set_backend(StatsdBackend::udp(host, port));
        StatsdMonitor::with_config(&config)
    }

    pub fn with_config(config: &StatsdClientConfig) -> Result<Self, StatsdClientBuildError> {
        let client = config.build()?.build();
        debug!("statsd monitor created for {}", config.backend());
        Ok(StatsdMonitor::from_client(client, config.backend().clone()))
    }

    pub fn from_client(client: StatsdClient, backend: StatsdBackend) -> Self {
        StatsdMonitor { backend, client }
    }

    #[inline]
    pub fn backend(&self) -> &StatsdBackend {
        &self.backend
    }

    fn emit_timing<'a, I>(&'a self, name: &'a str, latency: Duration, tags: I) -> MonitorResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = self.client.time_with_tags(name, latency);
        for tag in tags {
            builder = builder.with_tag_value(tag);
        }
        builder.try_send()?;
        Ok(())
    }

    fn emit_count<'a, I>(&'a self, name: &'a str, tags: I) -> MonitorResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = self.client.count_with_tags(name, 1_i64);
        for tag in tags {
            builder = builder.with_tag_value(tag);
        }
        builder.try_send()?;
        Ok(())
    }
}

impl MonitorStatsd for StatsdMonitor {
    fn monitor_latency(&self, name: &str, group: &str, latency: Duration) -> MonitorResult<()> {
        self.emit_timing(name, latency, iter::once(group))
    }

    fn monitor_counter(&self, name: &str, group: &str, _status: u16) -> MonitorResult<()> {
        self.emit_count(name, iter::once(group))
    }

    fn custom_monitor_counter(
        &self,
        name: &str,
        group: &str,
        tags: &CustomTags,
    ) -> MonitorResult<()> {
        let statsd_tags = build_tags(group, tags);
        self.emit_count(name, statsd_tags.iter().map(String::as_str))
    }

    fn custom_monitor_latency(
        &self,
        name: &str,
        group: &str,
        tags: &CustomTags,
        latency: Duration,
    ) -> MonitorResult<()> {
        let statsd_tags = build_tags(group, tags);
        self.emit_timing(name, latency, statsd_tags.iter().map(String::as_str))
    }
}
