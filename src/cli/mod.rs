//! Command-line interface module.

mod args;
pub mod build;
pub mod query;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands, QueryArgs};
