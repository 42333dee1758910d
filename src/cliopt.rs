use std::convert::TryFrom;
use std::path::PathBuf;

use structopt::StructOpt;

use crate::error::Result;
use crate::input::SnapshotFormat;

#[derive(Debug, StructOpt)]
#[structopt(name = "monq", about = "monq command line arguments")]
pub struct CliOpt {
    /// Query text; literal "\n" sequences are treated as line breaks.
    /// An argument starting with '@' names a file to read the query from.
    pub query: String,

    /// State snapshot file (defaults to stdin).
    #[structopt(long = "state", short = "s")]
    pub state: Option<PathBuf>,

    /// Snapshot format: 'json' or 'status-dat' (default: sniffed).
    #[structopt(long = "format", short = "f", parse(try_from_str = parse_format))]
    pub format: Option<SnapshotFormat>,

    /// Base directory of the per-host RRD file tree.
    #[structopt(long = "rrd-dir")]
    pub rrd_dir: Option<PathBuf>,

    /// Unix socket of the RRD caching daemon.
    #[structopt(long = "rrdcached")]
    pub rrdcached: Option<PathBuf>,

    /// Output encoding: 'json' (default) or 'csv'.
    #[structopt(long = "encode", short = "e")]
    pub encode: Option<String>,

    /// Log verbosity; repeat for more (-v warnings ... -vvvv trace).
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbose: u8,
}

fn parse_format(s: &str) -> Result<SnapshotFormat> {
    SnapshotFormat::try_from(s)
}
