mod perfdata;
mod status;
mod types;

pub use perfdata::{parse_perf_data, Perf};
pub use status::{Host, Service, Status};
pub use types::{SampleValue, Timestamp};
