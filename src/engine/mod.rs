mod executor;
mod filter;

pub use executor::Executor;
