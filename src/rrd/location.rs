use std::convert::TryFrom;
use std::path::{Path, PathBuf};

use super::cleanup::{cleanup_file_name, mangle_metric_name};
use crate::error::{Error, Result};
use crate::table::Row;

/// Where the samples of one performance metric live: the RRD file path
/// plus the consolidation function to read it with.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricLocation {
    path: PathBuf,
    cf: ConsolidationFn,
}

impl MetricLocation {
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn cf(&self) -> ConsolidationFn {
        self.cf
    }
}

/// Resolves the RRD file of a service metric:
///
///   base / host_name / cleanup(description + "_" + mangled_metric + ".rrd")
///
/// A row that is not a service resolves to nothing - absence is silent,
/// the caller emits an empty value.
pub fn service_metric_location(
    base: &Path,
    row: &Row,
    metric: &str,
    cf: ConsolidationFn,
) -> Option<MetricLocation> {
    let svc = row.service()?;
    Some(MetricLocation {
        path: base.join(&svc.host_name).join(cleanup_file_name(&format!(
            "{}_{}.rrd",
            svc.description,
            mangle_metric_name(metric)
        ))),
        cf,
    })
}

/// Host metrics live in the same per-host directory, with a fixed
/// `_HOST_` placeholder where the service description would be.
pub fn host_metric_location(
    base: &Path,
    row: &Row,
    metric: &str,
    cf: ConsolidationFn,
) -> Option<MetricLocation> {
    let host = row.host()?;
    Some(MetricLocation {
        path: base.join(&host.name).join(cleanup_file_name(&format!(
            "_HOST__{}.rrd",
            mangle_metric_name(metric)
        ))),
        cf,
    })
}

/// Aggregation applied when samples are read at a coarser resolution
/// than stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsolidationFn {
    Average,
    Min,
    Max,
    Last,
}

impl ConsolidationFn {
    /// The spelling the RRD caching daemon expects in FETCH commands.
    pub fn as_wire(self) -> &'static str {
        match self {
            ConsolidationFn::Average => "AVERAGE",
            ConsolidationFn::Min => "MIN",
            ConsolidationFn::Max => "MAX",
            ConsolidationFn::Last => "LAST",
        }
    }
}

impl Default for ConsolidationFn {
    fn default() -> Self {
        ConsolidationFn::Average
    }
}

impl TryFrom<&str> for ConsolidationFn {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "average" => Ok(ConsolidationFn::Average),
            "min" => Ok(ConsolidationFn::Min),
            "max" => Ok(ConsolidationFn::Max),
            "last" => Ok(ConsolidationFn::Last),
            _ => Err(format!("unknown consolidation function '{}'", name).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Host, Service};

    fn service(host_name: &str, description: &str) -> Service {
        Service {
            host_name: host_name.to_string(),
            description: description.to_string(),
            ..Service::default()
        }
    }

    #[test]
    fn test_service_metric_location() {
        #[rustfmt::skip]
        let tests = [
            (("web01", "CPU load", "load1"), "perf/web01/CPU_load_load1.rrd"),
            (("web01", "Disk IO", "read.ops/s"), "perf/web01/Disk_IO_read_ops_s.rrd"),
            (("db/1", "Memory", "used"), "perf/db/1/Memory_used.rrd"),
            (("web01", "fs /var", "user time"), "perf/web01/fs__var_user_time.rrd"),
        ];

        for ((host, description, metric), expected) in &tests {
            let svc = service(host, description);
            let loc = service_metric_location(
                Path::new("perf"),
                &Row::Service(&svc),
                metric,
                ConsolidationFn::default(),
            )
            .unwrap();

            assert_eq!(Path::new(expected), loc.path(), "for metric '{}'", metric);
            assert_eq!(ConsolidationFn::Average, loc.cf());
        }
    }

    #[test]
    fn test_service_metric_location_wrong_row_kind() {
        let host = Host {
            name: "web01".to_string(),
            ..Host::default()
        };

        assert_eq!(
            None,
            service_metric_location(
                Path::new("perf"),
                &Row::Host(&host),
                "load1",
                ConsolidationFn::default(),
            )
        );
    }

    #[test]
    fn test_host_metric_location() {
        let host = Host {
            name: "web01".to_string(),
            ..Host::default()
        };

        let loc = host_metric_location(
            Path::new("perf"),
            &Row::Host(&host),
            "rta",
            ConsolidationFn::Max,
        )
        .unwrap();

        assert_eq!(Path::new("perf/web01/_HOST__rta.rrd"), loc.path());
        assert_eq!(ConsolidationFn::Max, loc.cf());

        let svc = service("web01", "PING");
        assert_eq!(
            None,
            host_metric_location(
                Path::new("perf"),
                &Row::Service(&svc),
                "rta",
                ConsolidationFn::default(),
            )
        );
    }
}
