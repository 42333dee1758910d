// Unix timestamp in seconds - the native resolution of RRD files.
pub type Timestamp = i64;

pub type SampleValue = f64;
