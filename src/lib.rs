//! Launcher-side support for running Gatling with test-run reporting.
//!
//! The heart of the crate is [`args::encode`], which reduces the JVM flags a
//! run is launched with to a flat, secret-free key/value report.

pub mod args;
pub mod config;
pub mod events;
pub mod logging;
pub mod runs;
