mod decoder;
mod json;
mod statusdat;

pub use decoder::Decoder;
pub use json::JsonDecoder;
pub use statusdat::StatusDatDecoder;
