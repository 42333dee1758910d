use crate::model::{Host, Service};

/// A reference to one monitoring object. Column accessors resolve a
/// row to the record type they need; a row of the wrong kind yields an
/// empty value, never an error.
#[derive(Clone, Copy, Debug)]
pub enum Row<'a> {
    Host(&'a Host),
    Service(&'a Service),
}

impl<'a> Row<'a> {
    pub fn host(&self) -> Option<&'a Host> {
        match *self {
            Row::Host(host) => Some(host),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<&'a Service> {
        match *self {
            Row::Service(svc) => Some(svc),
            _ => None,
        }
    }
}
