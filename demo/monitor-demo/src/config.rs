/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

use statsd_monitor::StatsdClientConfig;

const KEY_STATSD: &str = "statsd";

pub(crate) fn load_statsd_config(path: &Path) -> anyhow::Result<StatsdClientConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {e:?}", path.display()))?;
    parse_statsd_config(&content).context(format!("invalid config file {}", path.display()))
}

fn parse_statsd_config(content: &str) -> anyhow::Result<StatsdClientConfig> {
    let docs =
        YamlLoader::load_from_str(content).map_err(|e| anyhow!("invalid yaml content: {e}"))?;
    let Some(doc) = docs.first() else {
        return Err(anyhow!("no yaml document found"));
    };

    if let Yaml::Hash(map) = doc {
        let key = Yaml::String(KEY_STATSD.to_string());
        match map.get(&key) {
            Some(v) => StatsdClientConfig::parse_yaml(v)
                .context(format!("invalid value for key {KEY_STATSD}")),
            None => Err(anyhow!("no {KEY_STATSD} config found")),
        }
    } else {
        Err(anyhow!("yaml value type for the config file should be 'map'"))
    }
}
