//! Common utilities for the sift selector engine.
//!
//! This crate provides shared infrastructure used by all sift components:
//! - **Warning System** - deduplicated diagnostics for non-standard selector usage
//! - **Logging** - `tracing` subscriber setup for binaries

pub mod logging;
pub mod warning;
