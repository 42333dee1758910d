use std::convert::TryFrom;
use std::io::BufRead;

use log::info;

use super::decoder::{Decoder, JsonDecoder, StatusDatDecoder};
use crate::error::{Error, Result};
use crate::model::Status;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotFormat {
    Json,
    StatusDat,
}

impl TryFrom<&str> for SnapshotFormat {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(SnapshotFormat::Json),
            "status-dat" => Ok(SnapshotFormat::StatusDat),
            _ => Err(format!("unknown snapshot format '{}'", name).into()),
        }
    }
}

pub struct Input {
    reader: Box<dyn BufRead>,
    format: Option<SnapshotFormat>,
}

impl Input {
    pub fn new(reader: Box<dyn BufRead>, format: Option<SnapshotFormat>) -> Self {
        Self { reader, format }
    }

    /// Reads the whole snapshot and decodes it. Without an explicit
    /// format the first non-blank byte decides: '{' means JSON,
    /// anything else the status.dat block format.
    pub fn load(mut self) -> Result<Status> {
        let mut buf = Vec::new();
        self.reader
            .read_to_end(&mut buf)
            .map_err(|e| ("couldn't read the state snapshot", e))?;

        let format = self.format.unwrap_or_else(|| sniff(&buf));
        let decoder: Box<dyn Decoder> = match format {
            SnapshotFormat::Json => Box::new(JsonDecoder::new()),
            SnapshotFormat::StatusDat => Box::new(StatusDatDecoder::new()),
        };

        let status = decoder.decode(&buf)?;
        info!(
            "loaded {} host(s) and {} service(s)",
            status.hosts.len(),
            status.services.len()
        );
        Ok(status)
    }
}

fn sniff(buf: &[u8]) -> SnapshotFormat {
    match buf.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => SnapshotFormat::Json,
        _ => SnapshotFormat::StatusDat,
    }
}
