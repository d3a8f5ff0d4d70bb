//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the lyrics resolution core:
//! - Logging and tracing infrastructure
//! - Configuration management (search thresholds, pacing, provider credentials)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the engine crates depend on.
//! Configuration is built once at startup and treated as read-only for the
//! lifetime of the process.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
