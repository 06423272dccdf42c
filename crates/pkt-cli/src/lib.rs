//! Library side of the `pkt` command line.
//!
//! The binary only parses arguments and prints; everything here is usable
//! from tests.

pub mod config;
pub mod logging;
pub mod report;
pub mod workflow;
