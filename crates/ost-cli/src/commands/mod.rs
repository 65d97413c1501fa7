//! CLI subcommand implementations.

pub mod batch;
pub mod evaluate;
pub mod timeline;
