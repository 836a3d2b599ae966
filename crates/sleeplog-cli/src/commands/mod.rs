//! CLI subcommand implementations.

pub mod check;
pub mod days;
pub mod source;
pub mod summary;
pub mod today;
pub mod util;
