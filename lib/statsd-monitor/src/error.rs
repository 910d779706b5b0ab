/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use cadence::MetricError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsdClientBuildError {
    #[error("failed to resolve statsd target {0}: {1:?}")]
    AddressError(String, io::Error),
    #[error("no socket address found for statsd target {0}")]
    NoAddress(String),
    #[error("socket error: {0:?}")]
    SocketError(io::Error),
    #[error("sink error: {0}")]
    SinkError(MetricError),
}

/// Errors returned by the monitor methods.
///
/// The client error is passed through as is, nothing is retried.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("statsd emit error: {0}")]
    Emit(#[from] MetricError),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
