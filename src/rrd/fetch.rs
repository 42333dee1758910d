use std::cell::RefCell;
use std::path::{Path, PathBuf};

use log::warn;

use super::client::RrdCachedClient;
use super::location::{ConsolidationFn, MetricLocation};
use super::series::TimeSeries;
use crate::error::Result;
use crate::model::Timestamp;

/// One metric fetch as requested by an `rrddata` column.
#[derive(Clone, Debug, PartialEq)]
pub struct RrdDataRequest {
    pub metric: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub resolution: u64,
    pub cf: ConsolidationFn,
}

/// Fetches metric time series through the RRD caching daemon. Both the
/// base directory of the RRD tree and the daemon socket are optional at
/// startup; queries using `rrddata` columns require both.
pub struct RrdFetcher {
    base_dir: Option<PathBuf>,
    client: Option<RefCell<RrdCachedClient>>,
}

impl RrdFetcher {
    pub fn new(base_dir: Option<PathBuf>, socket: Option<&Path>) -> Result<Self> {
        let client = match socket {
            Some(path) => Some(RefCell::new(RrdCachedClient::connect(path)?)),
            None => None,
        };

        Ok(Self { base_dir, client })
    }

    /// A fetcher that can answer no rrddata columns. Queries without
    /// them never notice.
    pub fn disconnected() -> Self {
        Self {
            base_dir: None,
            client: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_dir.is_some() && self.client.is_some()
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Fetches the samples behind an already resolved location. Fetch
    /// failures degrade to an empty series with a warning: one broken
    /// RRD file must not abort a streaming query.
    pub fn fetch(&self, location: &MetricLocation, req: &RrdDataRequest) -> TimeSeries {
        let client = match &self.client {
            Some(client) => client,
            None => return TimeSeries::empty(),
        };

        match client.borrow_mut().fetch(location, req.start, req.end) {
            Ok(series) => series.consolidate(req.resolution, location.cf()),
            Err(err) => {
                warn!("fetching {} failed: {}", location.path().display(), err);
                TimeSeries::empty()
            }
        }
    }
}
