//! Command implementations for the CLI
//!
//! - start: Start the relay server
//! - test: Test configuration validity
//! - config: Configuration display

pub mod config;
pub mod start;
