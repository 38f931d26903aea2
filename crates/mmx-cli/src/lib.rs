//! Library components of the `mmx` command-line tool.

pub mod ingest;
pub mod logging;
pub mod pipeline;
