use chrono::prelude::*;

use crate::error::Result;
use crate::model::Timestamp;

/// Parses a point in time given either as Unix seconds or as an RFC 3339
/// string (e.g. `2021-05-01T00:00:00Z`).
pub fn parse_timestamp(s: &str) -> Result<Timestamp> {
    if let Ok(secs) = s.parse::<Timestamp>() {
        return Ok(secs);
    }

    s.parse::<DateTime<Utc>>()
        .map(|t| t.timestamp())
        .map_err(|e| ("timestamp must be Unix seconds or RFC 3339", e).into())
}
