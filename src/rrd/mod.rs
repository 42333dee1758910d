mod cleanup;
mod client;
mod fetch;
mod location;
mod series;

pub use cleanup::{cleanup_file_name, mangle_metric_name};
pub use client::RrdCachedClient;
pub use fetch::{RrdDataRequest, RrdFetcher};
pub use location::{host_metric_location, service_metric_location, ConsolidationFn, MetricLocation};
pub use series::TimeSeries;
