mod encoder;
mod output;
mod writer;

pub use encoder::{CsvEncoder, Encoder, JsonEncoder};
pub use output::Output;
pub use writer::{LineWriter, Writer};
