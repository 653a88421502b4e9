//! PiyoLog export reader CLI library.
//!
//! This crate provides the `piyo` command: configuration loading and the
//! `import`, `check`, `status` and `export` subcommands.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
