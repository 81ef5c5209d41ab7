//! Shared types, errors, and configuration for Tessera.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe record references
//! - Application-wide error types
//! - Configuration management
//! - Telemetry (tracing) bootstrap

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::EngineConfig;
pub use error::{AppError, AppResult};
