//! The `combo` command-line tool.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
