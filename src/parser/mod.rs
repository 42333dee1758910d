pub mod ast;
mod common;
mod query;
mod result;

pub use query::parse_query;
