//! HealthDash Core - Domain models, reference tables, configuration and the load pipeline
//!
//! This crate contains the core domain logic and port definitions for the HealthDash system.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;
pub mod processing;

pub use error::{HealthError, Result};
pub use processing::{load, LoadOptions};
