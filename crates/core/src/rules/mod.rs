//! Rule registry and dispatch.
//!
//! A transaction tagged with a smart code enters dispatch; the code's domain
//! segment selects a registered rule processor, which turns the header and
//! its lines into GL entries. Dispatch never throws: every failure mode is a
//! value in the result's error list.

pub mod error;
pub mod processor;
pub mod registry;

pub use error::DispatchError;
pub use processor::{RuleOutcome, RuleProcessor};
pub use registry::{DispatchResult, RuleRegistry};
