/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;

/// Caller supplied tags, each entry will be sent as `key:value`.
pub type CustomTags = HashMap<String, String>;

/// Build the statsd tag list for a metric.
///
/// The group name always comes first and is sent as a bare tag value.
/// The custom tags follow in the iteration order of the map, which is not
/// stable between calls.
pub fn build_tags(group: &str, tags: &CustomTags) -> Vec<String> {
    let mut statsd_tags = Vec::with_capacity(tags.len() + 1);
    statsd_tags.push(group.to_string());
    statsd_tags.extend(tags.iter().map(|(k, v)| format!("{k}:{v}")));
    statsd_tags
}
