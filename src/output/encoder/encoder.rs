use crate::error::Result;
use crate::table::ColumnValue;

/// Turns one projected result row into its on-the-wire bytes. The line
/// delimiter between rows belongs to the writer, not the encoder.
pub trait Encoder {
    fn encode(&self, row: &[ColumnValue]) -> Result<Vec<u8>>;
}
