/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Instant;

use log::warn;

use statsd_monitor::{CustomTags, MonitorResult, MonitorStatsd};

const GROUP_REDIS: &str = "REDIS";
const GROUP_API_OUT: &str = "API-OUT";

const CACHE_HIT_HOTEL_ID123: &str = "app.hotel-price-engine.cache-hit-ratio.hotelid123";
const CACHE_HIT_HOTEL_456: &str = "app.hotel-price-engine.cache-hit-ratio.hotel456";
const CACHE_HIT_HOTEL_789: &str = "app.hotel-price-engine.cache-hit-ratio.hotel789";
const VENDOR_RESPONSE_EXPEDIA: &str = "app.hotel-price-engine.vendor-response.expedia-rapid";
const VENDOR_GET_AVAIL_RAKUTEN: &str = "app.hotel-price-engine.vendor-get-avail.rakuten";
const VENDOR_GET_CHECKRATE: &str = "app.hotel-price-engine.vendor-get-checkrate";

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DemoReport {
    pub(crate) sent: usize,
    pub(crate) failed: usize,
}

impl DemoReport {
    fn check(&mut self, name: &str, r: MonitorResult<()>) {
        match r {
            Ok(_) => self.sent += 1,
            Err(e) => {
                warn!("failed to send metric {name}: {e}");
                self.failed += 1;
            }
        }
    }
}

/// Send the demo metrics, latencies are measured from `start`.
///
/// Send errors are logged and counted, they do not stop the remaining calls.
pub(crate) fn run(monitor: &dyn MonitorStatsd, start: Instant) -> DemoReport {
    let mut tags = CustomTags::new();
    tags.insert("status".to_string(), "hit".to_string());

    let mut report = DemoReport::default();
    report.check(
        CACHE_HIT_HOTEL_ID123,
        monitor.custom_monitor_counter(CACHE_HIT_HOTEL_ID123, GROUP_REDIS, &tags),
    );
    report.check(
        VENDOR_RESPONSE_EXPEDIA,
        monitor.monitor_latency(VENDOR_RESPONSE_EXPEDIA, GROUP_API_OUT, start.elapsed()),
    );
    report.check(
        CACHE_HIT_HOTEL_456,
        monitor.monitor_counter(CACHE_HIT_HOTEL_456, GROUP_REDIS, 200),
    );
    report.check(
        CACHE_HIT_HOTEL_789,
        monitor.monitor_summary(CACHE_HIT_HOTEL_789, GROUP_REDIS, 200, start.elapsed()),
    );
    report.check(
        VENDOR_GET_AVAIL_RAKUTEN,
        monitor.custom_monitor_latency(
            VENDOR_GET_AVAIL_RAKUTEN,
            GROUP_API_OUT,
            &tags,
            start.elapsed(),
        ),
    );
    report.check(
        VENDOR_GET_CHECKRATE,
        monitor.custom_monitor_latency(VENDOR_GET_CHECKRATE, GROUP_API_OUT, &tags, start.elapsed()),
    );
    report
}
