use std::fs;
use std::io::{self, BufReader};

use chrono::Utc;
use structopt::StructOpt;

use monq::cliopt::CliOpt;
use monq::engine::Executor;
use monq::input::Input;
use monq::output::{CsvEncoder, Encoder, JsonEncoder, LineWriter, Output};
use monq::parser;
use monq::rrd::RrdFetcher;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();

    setup_logger(opt.verbose)?;

    let reader: Box<dyn io::BufRead> = match &opt.state {
        Some(path) => Box::new(BufReader::new(fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let input = Input::new(reader, opt.format);

    let output = Output::new(
        Box::new(LineWriter::new(io::stdout())),
        match opt.encode.as_deref() {
            None | Some("json") => Box::new(JsonEncoder::new()) as Box<dyn Encoder>,
            Some("csv") => Box::new(CsvEncoder::new()),
            Some(other) => return Err(format!("unknown encoding '{}'", other).into()),
        },
    );

    let fetcher = RrdFetcher::new(opt.rrd_dir.clone(), opt.rrdcached.as_deref())?;

    let query_text = match opt.query.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => opt.query.replace("\\n", "\n"),
    };
    let query = parser::parse_query(&query_text)?;

    let exctr = Executor::new(input.load()?, fetcher, output);
    exctr.execute(query)?;

    Ok(())
}

fn setup_logger(verbose: u8) -> Result<(), fern::InitError> {
    let level = match verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Utc::now().to_rfc3339(),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;

    Ok(())
}
