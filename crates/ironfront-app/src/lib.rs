//! IRONFRONT headless runner.
//!
//! This crate wires the match engine to a command line: rules come from a
//! TOML file, a scenario is played out at full speed, and the result is
//! reported as JSON.

pub mod runner;

pub use ironfront_core as core;
