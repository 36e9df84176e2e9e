//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the Tune SDK core:
//! - Logging and tracing infrastructure
//! - SDK configuration and host bridge wiring
//! - Event bus system
//!
//! ## Overview
//!
//! The ad and tracking crates depend on this crate for their configuration,
//! their logging conventions and for broadcasting lifecycle events to the host.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
