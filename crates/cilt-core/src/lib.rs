//! Shared configuration, identifiers and errors for the CILT scheduling crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
