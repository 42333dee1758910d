use super::types::SampleValue;

/// A single metric extracted from a check's performance data.
#[derive(Debug, PartialEq)]
pub struct Perf {
    pub name: String,
    pub value: SampleValue,
    pub unit: String,
}

/// Parses Nagios-style performance data:
/// `name=value[uom][;warn[;crit[;min[;max]]]]`, space-separated,
/// labels with spaces enclosed in single quotes.
///
/// Malformed chunks are dropped silently - performance data is
/// plugin-supplied and routinely sloppy.
pub fn parse_perf_data(perf_data: &str) -> Vec<Perf> {
    split_chunks(perf_data)
        .into_iter()
        .filter_map(|chunk| parse_chunk(&chunk))
        .collect()
}

fn split_chunks(perf_data: &str) -> Vec<String> {
    let mut chunks = vec![];
    let mut current = String::new();
    let mut quoted = false;

    for c in perf_data.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn parse_chunk(chunk: &str) -> Option<Perf> {
    let eq = if chunk.starts_with('\'') {
        // The label ends at the closing quote.
        let close = chunk[1..].find('\'')? + 1;
        if chunk[close + 1..].starts_with('=') {
            close + 1
        } else {
            return None;
        }
    } else {
        chunk.find('=')?
    };

    let name = chunk[..eq].trim_matches('\'');
    if name.is_empty() {
        return None;
    }

    // Only the value field matters here; warn/crit/min/max are dropped.
    let value_field = chunk[eq + 1..].split(';').next()?;
    let split = value_field
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'e')
        .unwrap_or_else(|| value_field.len());

    let value = value_field[..split].parse::<SampleValue>().ok()?;

    Some(Perf {
        name: name.to_string(),
        value,
        unit: value_field[split..].to_string(),
    })
}
