use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use log::debug;

use super::location::MetricLocation;
use super::series::TimeSeries;
use crate::error::Result;
use crate::model::{SampleValue, Timestamp};

/// A client for the RRD caching daemon's line protocol. Every command
/// is answered with a status line `<n> <message>`: n >= 0 means n
/// payload lines follow, n < 0 is a daemon-side error.
pub struct RrdCachedClient {
    stream: BufReader<UnixStream>,
}

impl RrdCachedClient {
    pub fn connect(socket: &Path) -> Result<Self> {
        let stream = UnixStream::connect(socket).map_err(|e| {
            (
                format!("couldn't connect to rrdcached at {}", socket.display()),
                e,
            )
        })?;

        Ok(Self {
            stream: BufReader::new(stream),
        })
    }

    /// Fetches the samples of a resolved metric location over
    /// (start, end]. The file is flushed first so journaled updates are
    /// visible; a failed flush is fine - the daemon may simply not know
    /// the file yet.
    pub fn fetch(
        &mut self,
        location: &MetricLocation,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<TimeSeries> {
        let path = location.path().display().to_string();

        if let Err(err) = self.command(&format!("FLUSH {}", path)) {
            debug!("flush of {} failed: {}", path, err);
        }

        let lines = self.command(&format!(
            "FETCH {} {} {} {}",
            path,
            location.cf().as_wire(),
            start,
            end
        ))?;

        parse_fetch_response(&lines)
    }

    fn command(&mut self, cmd: &str) -> Result<Vec<String>> {
        debug!("rrdcached <- {}", cmd);

        let stream = self.stream.get_mut();
        stream
            .write_all(cmd.as_bytes())
            .and_then(|_| stream.write_all(b"\n"))
            .map_err(|e| ("couldn't send command to rrdcached", e))?;

        let status = self.read_line()?;
        let (n, message) = parse_status_line(&status)?;
        if n < 0 {
            return Err(format!("rrdcached: {}", message).into());
        }

        let mut lines = Vec::with_capacity(n as usize);
        for _ in 0..n {
            lines.push(self.read_line()?);
        }
        Ok(lines)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self
            .stream
            .read_line(&mut line)
            .map_err(|e| ("couldn't read from rrdcached", e))?;
        if n == 0 {
            return Err("rrdcached closed the connection".into());
        }
        Ok(line.trim_end().to_string())
    }
}

fn parse_status_line(line: &str) -> Result<(i64, &str)> {
    let (n, message) = match line.split_once(' ') {
        Some((n, message)) => (n, message),
        None => (line, ""),
    };

    let n = n
        .parse::<i64>()
        .map_err(|e| (format!("malformed rrdcached status line '{}'", line), e))?;

    Ok((n, message))
}

/// Decodes a FETCH payload:
///
///   FlushVersion: 1
///   Start: 1619999940
///   End: 1620000240
///   Step: 60
///   DSCount: 1
///   DSName: 1
///   1620000000: 4.2000000000e-01
///   ...
///
/// Sample lines carry one value per data source; files in the perf-data
/// layout hold a single one. `nan` samples decode as holes.
fn parse_fetch_response(lines: &[String]) -> Result<TimeSeries> {
    let mut series = TimeSeries::empty();

    for line in lines {
        let (key, rest) = match line.split_once(':') {
            Some((key, rest)) => (key.trim(), rest.trim()),
            None => continue,
        };

        match key {
            "FlushVersion" | "DSCount" | "DSName" => (),
            "Start" => series.start = parse_field(key, rest)?,
            "End" => series.end = parse_field(key, rest)?,
            "Step" => series.step = parse_field(key, rest)?,
            _ => {
                // A sample line; the key is the timestamp.
                key.parse::<Timestamp>()
                    .map_err(|e| (format!("malformed rrdcached sample line '{}'", line), e))?;
                series.values.push(parse_sample(rest));
            }
        }
    }

    if series.step == 0 && !series.values.is_empty() {
        return Err("rrdcached FETCH response without a Step header".into());
    }

    Ok(series)
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + 'static,
{
    value
        .parse::<T>()
        .map_err(|e| (format!("malformed rrdcached header '{}: {}'", key, value), e).into())
}

fn parse_sample(fields: &str) -> Option<SampleValue> {
    let first = fields.split_whitespace().next()?;
    match first.parse::<SampleValue>() {
        Ok(v) if v.is_nan() => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_status_line() {
        assert_eq!((0, "Success"), parse_status_line("0 Success").unwrap());
        assert_eq!(
            (9, "Success"),
            parse_status_line("9 Success").unwrap()
        );
        assert_eq!(
            (-1, "No such file: /perf/web01/missing.rrd"),
            parse_status_line("-1 No such file: /perf/web01/missing.rrd").unwrap()
        );
        assert!(parse_status_line("garbage").is_err());
    }

    #[test]
    fn test_parse_fetch_response() {
        let series = parse_fetch_response(&lines(&[
            "FlushVersion: 1",
            "Start: 1619999940",
            "End: 1620000240",
            "Step: 60",
            "DSCount: 1",
            "DSName: 1",
            "1620000000: 4.2000000000e-01",
            "1620000060: nan",
            "1620000120: -nan",
            "1620000180: 1.0000000000e+00",
        ]))
        .unwrap();

        assert_eq!(1619999940, series.start);
        assert_eq!(1620000240, series.end);
        assert_eq!(60, series.step);
        assert_eq!(vec![Some(0.42), None, None, Some(1.0)], series.values);
    }

    #[test]
    fn test_parse_fetch_response_multiple_data_sources() {
        // Only the first data source is read.
        let series = parse_fetch_response(&lines(&[
            "Start: 0",
            "End: 20",
            "Step: 10",
            "DSCount: 2",
            "DSName: 1 2",
            "10: 1.0 2.0",
            "20: 3.0 4.0",
        ]))
        .unwrap();

        assert_eq!(vec![Some(1.0), Some(3.0)], series.values);
    }

    #[test]
    fn test_parse_fetch_response_malformed() {
        assert!(parse_fetch_response(&lines(&["Start: soon"])).is_err());
        assert!(parse_fetch_response(&lines(&["oops: 1.0"])).is_err());
        assert!(parse_fetch_response(&lines(&["10: 1.0"])).is_err());
    }

    #[test]
    fn test_parse_fetch_response_empty() {
        assert_eq!(TimeSeries::empty(), parse_fetch_response(&[]).unwrap());
    }
}
