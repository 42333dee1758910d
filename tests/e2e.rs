use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use structopt::StructOpt;

use monq::cliopt::CliOpt;
use monq::engine::Executor;
use monq::input::Input;
use monq::output::{CsvEncoder, Encoder, JsonEncoder, LineWriter, Output, Writer};
use monq::parser;
use monq::rrd::RrdFetcher;

#[test]
fn e2e() -> Result<(), Box<dyn std::error::Error>> {
    let root_test_dir = Path::new(file!()).parent().unwrap().join("scenarios");

    for test_dir in fs::read_dir(&root_test_dir)? {
        let test_dir = test_dir?.path();

        if let Ok(filter) = std::env::var("E2E_CASE") {
            if !test_dir.as_os_str().to_string_lossy().ends_with(&filter) {
                continue;
            }
        }

        let cli_args: Vec<String> =
            serde_json::from_str(&fs::read_to_string(test_dir.join("args.json"))?)?;

        let actual_output = query(
            Box::new(io::BufReader::new(fs::File::open(test_dir.join("state"))?)),
            &cli_args,
        )?;

        let expected_output = fs::read(test_dir.join("output"))?;

        assert_eq!(
            expected_output,
            actual_output,
            "\nUnexpected query result in '{}'.\nExpected:\n{}\nActual:\n{}",
            test_dir.display(),
            String::from_utf8_lossy(&expected_output),
            String::from_utf8_lossy(&actual_output),
        );
    }

    Ok(())
}

fn query(
    reader: Box<dyn io::BufRead>,
    cli_args: &[String],
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let opt = CliOpt::from_iter(cli_args);

    let input = Input::new(reader, opt.format);

    let writer = Rc::new(RefCell::new(LineWriter::new(Vec::new())));

    struct TestWriter(Rc<RefCell<LineWriter<Vec<u8>>>>);

    impl Writer for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<()> {
            self.0.borrow_mut().write(buf)
        }
    }

    let output = Output::new(
        Box::new(TestWriter(Rc::clone(&writer))),
        match opt.encode.as_deref() {
            None | Some("json") => Box::new(JsonEncoder::new()) as Box<dyn Encoder>,
            Some("csv") => Box::new(CsvEncoder::new()),
            Some(other) => return Err(format!("unknown encoding '{}'", other).into()),
        },
    );

    let query_ast = parser::parse_query(&opt.query.replace("\\n", "\n"))?;

    let exctr = Executor::new(input.load()?, RrdFetcher::disconnected(), output);
    exctr.execute(query_ast)?;

    // To make Rc::try_unwrap(writer) work.
    drop(exctr);

    let writer = match Rc::try_unwrap(writer) {
        Ok(writer) => writer,
        _ => unreachable!(),
    };

    Ok(writer.into_inner().into_inner())
}
