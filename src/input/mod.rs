mod decoder;
mod input;

pub use decoder::{Decoder, JsonDecoder, StatusDatDecoder};
pub use input::{Input, SnapshotFormat};
