//! Structured logging setup.
//!
//! Everything in the crate logs through `tracing` macros with structured
//! fields. This module installs the subscriber that renders those events,
//! either to stderr or to a size-rotated log file.
//!
//! # Configuration
//!
//! The filter is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::init_tracing;
