//! segparse CLI library
//!
//! This library provides the command-line interface for parsing sentences
//! with a grammar and lexicons described in a TOML file.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;

pub use error::{CliError, CliResult};
