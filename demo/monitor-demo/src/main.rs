/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use statsd_monitor::StatsdMonitor;

mod config;
mod logger;
mod opts;
mod scenario;

fn main() -> anyhow::Result<()> {
    let start = Instant::now();

    let proc_args = opts::parse_clap().context("failed to parse command line options")?;
    let _logger_guard = logger::setup(proc_args.verbose).context("failed to setup logger")?;
    debug!("{proc_args:?}");

    let monitor = StatsdMonitor::with_config(&proc_args.statsd).context(format!(
        "failed to create statsd monitor for {}",
        proc_args.statsd.backend()
    ))?;
    info!("sending demo metrics to {}", monitor.backend());

    let report = scenario::run(&monitor, start);
    info!(
        "demo metrics done: {} sent, {} failed",
        report.sent, report.failed
    );

    if !proc_args.drain_wait.is_zero() {
        info!("waiting {:?} for pending datagrams", proc_args.drain_wait);
        std::thread::sleep(proc_args.drain_wait);
    }
    // buffered sinks are flushed on drop
    drop(monitor);
    Ok(())
}
