use super::decoder::Decoder;
use crate::error::Result;
use crate::model::Status;

/// Decodes `{"hosts": [...], "services": [...]}` snapshots.
pub struct JsonDecoder {}

impl JsonDecoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Decoder for JsonDecoder {
    fn decode(&self, buf: &[u8]) -> Result<Status> {
        serde_json::from_slice(buf).map_err(|e| ("couldn't decode the JSON snapshot", e).into())
    }
}
