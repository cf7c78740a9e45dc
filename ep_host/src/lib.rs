//! Terminal host for the Eagler portal controller.
//!
//! This library provides command parsing and the host that drives a
//! mounted controller against the simulated browser. Used by the ep_host
//! binary.

pub mod commands;
pub mod host;
pub mod reader;
