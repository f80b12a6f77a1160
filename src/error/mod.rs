//! Violation types for validation failures.
//!
//! This module provides the violation taxonomy along with the single and
//! accumulated violation carriers.

mod violation;

pub use violation::{Violation, ViolationKind, Violations};
