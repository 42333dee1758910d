use crate::error::Result;
use crate::model::Status;

pub trait Decoder {
    fn decode(&self, buf: &[u8]) -> Result<Status>;
}
