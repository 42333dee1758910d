use serde::Deserialize;

use super::perfdata::{parse_perf_data, Perf};
use super::types::Timestamp;

/// A monitored host as found in a state snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub address: String,
    /// 0 - up, 1 - down, 2 - unreachable.
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub plugin_output: String,
    #[serde(default)]
    pub last_check: Timestamp,
    #[serde(default)]
    pub performance_data: String,
}

impl Host {
    pub fn metrics(&self) -> Vec<Perf> {
        parse_perf_data(&self.performance_data)
    }
}

/// A monitored service as found in a state snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct Service {
    pub host_name: String,
    pub description: String,
    /// 0 - ok, 1 - warning, 2 - critical, 3 - unknown.
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub plugin_output: String,
    #[serde(default)]
    pub last_check: Timestamp,
    #[serde(default)]
    pub performance_data: String,
}

impl Service {
    pub fn metrics(&self) -> Vec<Perf> {
        parse_perf_data(&self.performance_data)
    }
}

/// A decoded state snapshot. Row iteration order is load order.
#[derive(Debug, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub services: Vec<Service>,
}
