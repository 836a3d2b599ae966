//! Sleep log CLI library.
//!
//! This crate provides the CLI interface over the sleep-log engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
