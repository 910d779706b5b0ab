/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use statsd_monitor::{
    DEFAULT_STATSD_HOST, DEFAULT_STATSD_PORT, StatsdBackend, StatsdClientConfig,
};

const ARG_HOST: &str = "host";
const ARG_PORT: &str = "port";
const ARG_CONFIG: &str = "config";
const ARG_PREFIX: &str = "prefix";
const ARG_CACHE_SIZE: &str = "cache-size";
const ARG_DRAIN_WAIT: &str = "drain-wait";
const ARG_VERBOSE: &str = "verbose";

#[derive(Debug)]
pub(crate) struct ProcArgs {
    pub(crate) statsd: StatsdClientConfig,
    pub(crate) drain_wait: Duration,
    pub(crate) verbose: u8,
}

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new(ARG_HOST)
                .help("Statsd server host")
                .long(ARG_HOST)
                .num_args(1)
                .default_value(DEFAULT_STATSD_HOST)
                .conflicts_with(ARG_CONFIG),
        )
        .arg(
            Arg::new(ARG_PORT)
                .help("Statsd server port")
                .long(ARG_PORT)
                .num_args(1)
                .value_parser(value_parser!(u16))
                .default_value(DEFAULT_STATSD_PORT.to_string())
                .conflicts_with(ARG_CONFIG),
        )
        .arg(
            Arg::new(ARG_CONFIG)
                .help("Config file, which should contain a 'statsd' map")
                .short('c')
                .long(ARG_CONFIG)
                .num_args(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_PREFIX)
                .help("Metrics name prefix")
                .long(ARG_PREFIX)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_CACHE_SIZE)
                .help("Buffer metrics up to this many bytes before sending")
                .long(ARG_CACHE_SIZE)
                .num_args(1)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_DRAIN_WAIT)
                .help("Seconds to wait before exit")
                .long(ARG_DRAIN_WAIT)
                .num_args(1)
                .value_parser(value_parser!(u64))
                .default_value("5"),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show verbose output")
                .short('v')
                .long(ARG_VERBOSE)
                .action(ArgAction::Count),
        )
}

impl ProcArgs {
    fn parse_matches(args: &ArgMatches) -> anyhow::Result<Self> {
        let mut statsd = if let Some(file) = args.get_one::<PathBuf>(ARG_CONFIG) {
            crate::config::load_statsd_config(file)
                .context(format!("failed to load config file {}", file.display()))?
        } else {
            let mut config = StatsdClientConfig::default();
            if let (Some(host), Some(port)) = (
                args.get_one::<String>(ARG_HOST),
                args.get_one::<u16>(ARG_PORT),
            ) {
                config.set_backend(StatsdBackend::udp(host.as_str(), *port));
            }
            config
        };

        if let Some(prefix) = args.get_one::<String>(ARG_PREFIX) {
            statsd.set_prefix(prefix.as_str());
        }
        if let Some(size) = args.get_one::<usize>(ARG_CACHE_SIZE) {
            statsd.set_cache_size(*size);
        }

        let drain_wait = args
            .get_one::<u64>(ARG_DRAIN_WAIT)
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or_default();

        Ok(ProcArgs {
            statsd,
            drain_wait,
            verbose: args.get_count(ARG_VERBOSE),
        })
    }
}

pub(crate) fn parse_clap() -> anyhow::Result<ProcArgs> {
    let args = build_cli_args().get_matches();
    ProcArgs::parse_matches(&args)
}
