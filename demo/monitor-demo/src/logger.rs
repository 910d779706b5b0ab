/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use slog::{Drain, Level, Logger, o};
use slog_scope::GlobalLoggerGuard;

fn verbose_level(verbose: u8) -> (Level, log::Level) {
    match verbose {
        0 => (Level::Info, log::Level::Info),
        1 => (Level::Debug, log::Level::Debug),
        _ => (Level::Trace, log::Level::Trace),
    }
}

pub(crate) fn setup(verbose: u8) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let (slog_level, log_level) = verbose_level(verbose);

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(slog_level).fuse();
    let logger = Logger::root(drain, o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    slog_stdlog::init_with_level(log_level)?;
    Ok(scope_guard)
}
