/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

use super::{DEFAULT_STATSD_PORT, StatsdBackend, StatsdClientConfig};

fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        _ => Err(anyhow!("yaml value type for 'string' should be 'string'")),
    }
}

fn as_u16(v: &Yaml) -> anyhow::Result<u16> {
    match v {
        Yaml::String(s) => Ok(u16::from_str(s)?),
        Yaml::Integer(i) => Ok(u16::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'u16' should be 'string' or 'integer'"
        )),
    }
}

fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

fn as_ipaddr(v: &Yaml) -> anyhow::Result<IpAddr> {
    if let Yaml::String(s) = v {
        let ip = IpAddr::from_str(s).map_err(|e| anyhow!("invalid ip address: {e}"))?;
        Ok(ip)
    } else {
        Err(anyhow!("yaml value type for 'IpAddr' should be 'string'"))
    }
}

#[cfg(unix)]
fn as_absolute_path(v: &Yaml) -> anyhow::Result<PathBuf> {
    if let Yaml::String(s) = v {
        let path = PathBuf::from(s);
        if !path.is_absolute() {
            return Err(anyhow!("path {s} is not absolute"));
        }
        Ok(path)
    } else {
        Err(anyhow!("yaml value type for 'absolute path' should be 'string'"))
    }
}

/// Split `host:port`, an IPv6 host should be wrapped in brackets.
fn parse_host_port(s: &str) -> anyhow::Result<(String, u16)> {
    let Some((host, port)) = s.rsplit_once(':') else {
        return Err(anyhow!("no port found in address {s}"));
    };
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return Err(anyhow!("no host found in address {s}"));
    }
    let port = u16::from_str(port).map_err(|e| anyhow!("invalid port in address {s}: {e}"))?;
    Ok((host.to_string(), port))
}

impl StatsdBackend {
    pub fn parse_udp_yaml(v: &Yaml) -> anyhow::Result<Self> {
        match v {
            Yaml::Hash(map) => {
                let mut address: Option<(String, u16)> = None;
                let mut host: Option<String> = None;
                let mut port: Option<u16> = None;
                let mut bind: Option<IpAddr> = None;

                foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                    "address" | "addr" => {
                        let s = as_string(v)?;
                        address = Some(
                            parse_host_port(&s)
                                .context(format!("invalid statsd udp address value for key {k}"))?,
                        );
                        Ok(())
                    }
                    "host" => {
                        host = Some(as_string(v).context(format!("invalid value for key {k}"))?);
                        Ok(())
                    }
                    "port" => {
                        port = Some(as_u16(v).context(format!("invalid value for key {k}"))?);
                        Ok(())
                    }
                    "bind_ip" | "bind" => {
                        bind = Some(as_ipaddr(v).context(format!("invalid value for key {k}"))?);
                        Ok(())
                    }
                    _ => Err(anyhow!("invalid key {k}")),
                })?;

                let (host, port) = match (address, host) {
                    (Some(_), Some(_)) => {
                        return Err(anyhow!("only one of 'address' and 'host' can be set"));
                    }
                    (Some((host, port)), None) => (host, port),
                    (None, Some(host)) => (host, port.unwrap_or(DEFAULT_STATSD_PORT)),
                    (None, None) => return Err(anyhow!("no target address has been set")),
                };
                Ok(StatsdBackend::Udp { host, port, bind })
            }
            Yaml::String(s) => {
                let (host, port) = parse_host_port(s)?;
                Ok(StatsdBackend::udp(host, port))
            }
            _ => Err(anyhow!("invalid yaml value for udp statsd backend")),
        }
    }

    #[cfg(unix)]
    pub fn parse_unix_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let path = match v {
            Yaml::Hash(map) => {
                let mut path: Option<PathBuf> = None;
                foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                    "path" => {
                        path = Some(as_absolute_path(v)?);
                        Ok(())
                    }
                    _ => Err(anyhow!("invalid key {k}")),
                })?;
                path.ok_or_else(|| anyhow!("no path has been set"))?
            }
            Yaml::String(_) => as_absolute_path(v)?,
            _ => return Err(anyhow!("invalid yaml value for unix statsd backend")),
        };
        Ok(StatsdBackend::Unix(path))
    }

    /// Parse the backend value for a normalized backend type, `udp` or `unix`.
    fn parse_typed_yaml(backend_type: &str, v: &Yaml) -> anyhow::Result<Self> {
        match backend_type {
            "udp" => StatsdBackend::parse_udp_yaml(v),
            #[cfg(unix)]
            "unix" => StatsdBackend::parse_unix_yaml(v),
            _ => Err(anyhow!("unsupported statsd backend type {backend_type}")),
        }
    }
}

impl StatsdClientConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = StatsdClientConfig::default();
            foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'statsd client config' should be 'map'"
            ))
        }
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        let key = normalize_key(k);
        if let Some(backend_type) = key
            .strip_prefix("target_")
            .or_else(|| key.strip_prefix("backend_"))
        {
            let target = StatsdBackend::parse_typed_yaml(backend_type, v)
                .context(format!("invalid value for key {k}"))?;
            self.set_backend(target);
            return Ok(());
        }

        match key.as_str() {
            "target" | "backend" => {
                let Yaml::Hash(map) = v else {
                    return Err(anyhow!("yaml value type for key {k} should be 'map'"));
                };
                return foreach_kv(map, |k, v| {
                    let target = StatsdBackend::parse_typed_yaml(&normalize_key(k), v)?;
                    self.set_backend(target);
                    Ok(())
                })
                .context(format!("invalid value for key {k}"));
            }
            "prefix" => {
                let prefix = as_string(v).context(format!("invalid metrics prefix for key {k}"))?;
                self.set_prefix(prefix);
            }
            "cache_size" => {
                let size = as_usize(v).context(format!("invalid usize value for key {k}"))?;
                self.set_cache_size(size);
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use yaml_rust::YamlLoader;

    macro_rules! yaml_doc {
        ($s:expr) => {
            YamlLoader::load_from_str($s).unwrap().pop().unwrap()
        };
    }

    #[test]
    fn host_port() {
        assert_eq!(
            parse_host_port("localhost:8125").unwrap(),
            ("localhost".to_string(), 8125)
        );
        assert_eq!(
            parse_host_port("[::1]:9125").unwrap(),
            ("::1".to_string(), 9125)
        );
        assert!(parse_host_port("localhost").is_err());
        assert!(parse_host_port(":8125").is_err());
        assert!(parse_host_port("localhost:http").is_err());
        assert!(parse_host_port("localhost:70000").is_err());
    }

    #[test]
    fn parse_udp_yaml_ok() {
        let yaml = yaml_doc!(
            r#"
                address: "127.0.0.1:8125"
                bind_ip: "127.0.0.1"
            "#
        );
        let backend = StatsdBackend::parse_udp_yaml(&yaml).unwrap();
        assert_eq!(
            backend,
            StatsdBackend::Udp {
                host: "127.0.0.1".to_string(),
                port: 8125,
                bind: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            }
        );

        let yaml = yaml_doc!(
            r#"
                host: "statsd.example.net"
            "#
        );
        let backend = StatsdBackend::parse_udp_yaml(&yaml).unwrap();
        assert_eq!(backend, StatsdBackend::udp("statsd.example.net", 8125));

        let yaml = yaml_doc!(
            r#"
                Host: "statsd.example.net"
                Port: 9125
            "#
        );
        let backend = StatsdBackend::parse_udp_yaml(&yaml).unwrap();
        assert_eq!(backend, StatsdBackend::udp("statsd.example.net", 9125));

        let yaml = Yaml::String("localhost:8125".to_string());
        let backend = StatsdBackend::parse_udp_yaml(&yaml).unwrap();
        assert_eq!(backend, StatsdBackend::udp("localhost", 8125));
    }

    #[test]
    fn parse_udp_yaml_err() {
        let yaml = yaml_doc!(
            r#"
                invalid_key: "value"
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                address: "no-port"
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                address: "127.0.0.1:8125"
                bind_ip: "invalid-ip"
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                address: "127.0.0.1:8125"
                host: "127.0.0.1"
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                bind_ip: "127.0.0.1"
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                host: "localhost"
                port: -1
            "#
        );
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = Yaml::Array(vec![]);
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());

        let yaml = Yaml::Integer(123);
        assert!(StatsdBackend::parse_udp_yaml(&yaml).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn parse_unix_yaml() {
        let yaml = yaml_doc!(
            r#"
                path: "/var/run/statsd.sock"
            "#
        );
        let backend = StatsdBackend::parse_unix_yaml(&yaml).unwrap();
        assert_eq!(
            backend,
            StatsdBackend::Unix(PathBuf::from("/var/run/statsd.sock"))
        );

        let yaml = yaml_doc!(
            r#"
                path: "relative/path"
            "#
        );
        assert!(StatsdBackend::parse_unix_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                path:
            "#
        );
        assert!(StatsdBackend::parse_unix_yaml(&yaml).is_err());

        let yaml = Yaml::Boolean(true);
        assert!(StatsdBackend::parse_unix_yaml(&yaml).is_err());
    }

    #[test]
    fn parse_yaml_ok() {
        let yaml = yaml_doc!(
            r#"
                target_udp: "127.0.0.1:8125"
                prefix: "app.hotel-price-engine"
                cache_size: 512
            "#
        );
        let config = StatsdClientConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.backend(), &StatsdBackend::udp("127.0.0.1", 8125));
        assert_eq!(config.prefix(), "app.hotel-price-engine");
        assert_eq!(config.cache_size(), Some(512));

        let yaml = yaml_doc!(
            r#"
                target:
                  udp:
                    addr: "10.0.0.1:8126"
                    bind: "0.0.0.0"
            "#
        );
        let config = StatsdClientConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.backend(),
            &StatsdBackend::Udp {
                host: "10.0.0.1".to_string(),
                port: 8126,
                bind: Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            }
        );
        assert_eq!(config.prefix(), "");
        assert_eq!(config.cache_size(), None);

        #[cfg(unix)]
        {
            let yaml = yaml_doc!(
                r#"
                    backend-unix: "/tmp/statsd.sock"
                "#
            );
            let config = StatsdClientConfig::parse_yaml(&yaml).unwrap();
            assert_eq!(
                config.backend(),
                &StatsdBackend::Unix(PathBuf::from("/tmp/statsd.sock"))
            );
        }
    }

    #[test]
    fn parse_yaml_err() {
        let yaml = yaml_doc!(
            r#"
                invalid_key: "value"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                target_udp: "invalid-address"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                target: "not_a_map"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                backend:
                  invalid_backend: "value"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                target_tcp: "127.0.0.1:8125"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                backend:
                  udp: "127.0.0.1:8125"
                  tcp: "127.0.0.1:8125"
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                prefix: 123
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                cache_size: -1
            "#
        );
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Array(vec![]);
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Null;
        assert!(StatsdClientConfig::parse_yaml(&yaml).is_err());
    }
}
