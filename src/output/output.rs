use super::encoder::Encoder;
use super::writer::Writer;
use crate::error::Result;
use crate::table::ColumnValue;

pub struct Output {
    writer: Box<dyn Writer>,
    encoder: Box<dyn Encoder>,
}

impl Output {
    pub fn new(writer: Box<dyn Writer>, encoder: Box<dyn Encoder>) -> Self {
        Self { writer, encoder }
    }

    /// Queries may override the encoder with an OutputFormat: header.
    pub fn set_encoder(&mut self, encoder: Box<dyn Encoder>) {
        self.encoder = encoder;
    }

    pub fn write(&mut self, row: &[ColumnValue]) -> Result<()> {
        let buf = self.encoder.encode(row)?;

        self.writer
            .write(&buf)
            .map_err(|e| ("writer failed", e))?;

        Ok(())
    }
}
