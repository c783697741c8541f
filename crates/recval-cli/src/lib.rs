//! Library components of the `recval` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
