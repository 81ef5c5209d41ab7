//! Common types used across the substrate.

pub mod id;

pub use id::*;
