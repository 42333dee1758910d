use std::collections::HashMap;

use super::decoder::Decoder;
use crate::error::{Error, Result};
use crate::model::{Host, Service, Status};

/// Decodes the classic status.dat block format:
///
///   hoststatus {
///       host_name=web01
///       current_state=0
///       }
///
/// Block types other than hoststatus/servicestatus (info,
/// programstatus, downtimes, ...) are skipped. Unknown keys inside a
/// block are ignored; numeric fields that fail to parse fall back to
/// zero - plugin-written state files are routinely sloppy.
pub struct StatusDatDecoder {}

impl StatusDatDecoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Decoder for StatusDatDecoder {
    fn decode(&self, buf: &[u8]) -> Result<Status> {
        let text = std::str::from_utf8(buf)
            .map_err(|e| ("status.dat snapshot is not valid UTF-8", e))?;

        let mut status = Status::default();
        let mut block: Option<(String, HashMap<String, String>)> = None;

        for (no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line == "}" {
                let (kind, fields) = block.take().ok_or_else(|| {
                    Error::from(format!("status.dat line {}: '}}' outside of any block", no + 1))
                })?;
                match kind.as_str() {
                    "hoststatus" => status.hosts.push(host_from(&fields)?),
                    "servicestatus" => status.services.push(service_from(&fields)?),
                    _ => (),
                }
                continue;
            }

            match &mut block {
                Some((_, fields)) => {
                    if let Some((key, value)) = line.split_once('=') {
                        fields.insert(key.to_string(), value.to_string());
                    }
                }
                None if line.ends_with('{') => {
                    block = Some((
                        line.trim_end_matches('{').trim().to_string(),
                        HashMap::new(),
                    ));
                }
                None => {
                    return Err(format!(
                        "status.dat line {}: '{}' outside of any block",
                        no + 1,
                        line
                    )
                    .into());
                }
            }
        }

        if block.is_some() {
            return Err(Error::new("status.dat snapshot ends inside a block"));
        }

        Ok(status)
    }
}

fn host_from(fields: &HashMap<String, String>) -> Result<Host> {
    Ok(Host {
        name: required(fields, "host_name", "hoststatus")?,
        alias: text(fields, "alias"),
        address: text(fields, "address"),
        state: number(fields, "current_state"),
        plugin_output: text(fields, "plugin_output"),
        last_check: number(fields, "last_check"),
        performance_data: text(fields, "performance_data"),
    })
}

fn service_from(fields: &HashMap<String, String>) -> Result<Service> {
    Ok(Service {
        host_name: required(fields, "host_name", "servicestatus")?,
        description: required(fields, "service_description", "servicestatus")?,
        state: number(fields, "current_state"),
        plugin_output: text(fields, "plugin_output"),
        last_check: number(fields, "last_check"),
        performance_data: text(fields, "performance_data"),
    })
}

fn required(fields: &HashMap<String, String>, key: &str, block: &str) -> Result<String> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| format!("{} block without {}", block, key).into())
}

fn text(fields: &HashMap<String, String>, key: &str) -> String {
    fields.get(key).cloned().unwrap_or_default()
}

fn number(fields: &HashMap<String, String>, key: &str) -> i64 {
    fields
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
