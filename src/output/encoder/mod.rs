mod csv;
mod encoder;
mod json;

pub use csv::CsvEncoder;
pub use encoder::Encoder;
pub use json::JsonEncoder;
