//! CLI support for the `xsearch` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
