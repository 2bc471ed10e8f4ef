// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration loaded from environment variables.

use rackmap_geometry::LayoutConfig;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed layout file.
    pub layout_path: PathBuf,
    /// Lateral placement of slots.
    pub layout: LayoutConfig,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LayoutConfig::default();
        let parsed = |key: &str, default| parse_or(lookup(key), default);

        Self {
            layout_path: lookup("RACKMAP_LAYOUT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("layout.csv")),
            layout: LayoutConfig {
                aisle_spacing: parsed("RACKMAP_AISLE_SPACING", defaults.aisle_spacing),
                side_offset: parsed("RACKMAP_SIDE_OFFSET", defaults.side_offset),
                micro_offset: parsed("RACKMAP_MICRO_OFFSET", defaults.micro_offset),
                default_level_height: parsed(
                    "RACKMAP_DEFAULT_LEVEL_HEIGHT",
                    defaults.default_level_height,
                ),
            },
            worker_threads: parse_or(lookup("RACKMAP_WORKER_THREADS"), num_cpus::get()).max(1),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
