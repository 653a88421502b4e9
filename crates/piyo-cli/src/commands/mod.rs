//! CLI subcommand implementations.

pub mod check;
pub mod export;
pub mod import;
pub mod status;
pub mod util;
