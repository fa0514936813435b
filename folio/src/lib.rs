//! Expose folio's internal API for use in testing. The library crate for
//! embedding the pipeline is `folio-core`; this API follows the needs of the
//! command line tool.
pub mod cli;
pub mod config;
pub mod error;
pub mod postprocess;
pub mod render;
pub mod template;
