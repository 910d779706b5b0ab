/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;

use cadence::{BufferedUdpMetricSink, StatsdClient, StatsdClientBuilder, UdpMetricSink};
#[cfg(unix)]
use cadence::{BufferedUnixMetricSink, UnixMetricSink};

use crate::StatsdClientBuildError;

#[cfg(feature = "yaml")]
mod yaml;

pub const DEFAULT_STATSD_HOST: &str = "localhost";
pub const DEFAULT_STATSD_PORT: u16 = cadence::DEFAULT_PORT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsdBackend {
    Udp {
        host: String,
        port: u16,
        bind: Option<IpAddr>,
    },
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Default for StatsdBackend {
    fn default() -> Self {
        StatsdBackend::udp(DEFAULT_STATSD_HOST, DEFAULT_STATSD_PORT)
    }
}

impl fmt::Display for StatsdBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsdBackend::Udp { host, port, .. } => {
                if host.contains(':') {
                    write!(f, "udp://[{host}]:{port}")
                } else {
                    write!(f, "udp://{host}:{port}")
                }
            }
            #[cfg(unix)]
            StatsdBackend::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}

impl StatsdBackend {
    pub fn udp<H: Into<String>>(host: H, port: u16) -> Self {
        StatsdBackend::Udp {
            host: host.into(),
            port,
            bind: None,
        }
    }

    fn resolve_udp(&self, host: &str, port: u16) -> Result<SocketAddr, StatsdClientBuildError> {
        let mut addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| StatsdClientBuildError::AddressError(self.to_string(), e))?;
        addrs
            .next()
            .ok_or_else(|| StatsdClientBuildError::NoAddress(self.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsdClientConfig {
    backend: StatsdBackend,
    prefix: String,
    cache_size: Option<usize>,
}

impl StatsdClientConfig {
    pub fn with_prefix<T: Into<String>>(prefix: T) -> Self {
        StatsdClientConfig {
            backend: StatsdBackend::default(),
            prefix: prefix.into(),
            cache_size: None,
        }
    }

    pub fn set_backend(&mut self, target: StatsdBackend) {
        self.backend = target;
    }

    pub fn set_prefix<T: Into<String>>(&mut self, prefix: T) {
        self.prefix = prefix.into();
    }

    /// Buffer metrics up to `size` bytes before writing to the socket.
    ///
    /// Without a cache size every metric is sent in its own datagram.
    pub fn set_cache_size(&mut self, size: usize) {
        self.cache_size = Some(size);
    }

    #[inline]
    pub fn backend(&self) -> &StatsdBackend {
        &self.backend
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn cache_size(&self) -> Option<usize> {
        self.cache_size
    }

    pub fn build(&self) -> Result<StatsdClientBuilder, StatsdClientBuildError> {
        let builder = match &self.backend {
            StatsdBackend::Udp { host, port, bind } => {
                let addr = self.backend.resolve_udp(host, *port)?;
                let bind_ip = bind.unwrap_or(match addr {
                    SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
                });
                let socket = UdpSocket::bind(SocketAddr::new(bind_ip, 0))
                    .map_err(StatsdClientBuildError::SocketError)?;
                if let Some(cache_size) = self.cache_size {
                    let sink = BufferedUdpMetricSink::with_capacity(addr, socket, cache_size)
                        .map_err(StatsdClientBuildError::SinkError)?;
                    StatsdClient::builder(&self.prefix, sink)
                } else {
                    let sink = UdpMetricSink::from(addr, socket)
                        .map_err(StatsdClientBuildError::SinkError)?;
                    StatsdClient::builder(&self.prefix, sink)
                }
            }
            #[cfg(unix)]
            StatsdBackend::Unix(path) => {
                let socket =
                    UnixDatagram::unbound().map_err(StatsdClientBuildError::SocketError)?;
                if let Some(cache_size) = self.cache_size {
                    let sink = BufferedUnixMetricSink::with_capacity(path, socket, cache_size);
                    StatsdClient::builder(&self.prefix, sink)
                } else {
                    let sink = UnixMetricSink::from(path, socket);
                    StatsdClient::builder(&self.prefix, sink)
                }
            }
        };

        Ok(builder)
    }
}
