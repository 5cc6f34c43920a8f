//! E2E test harness for tablock.
//!
//! Some builders and assertion variants are only used by a subset of the
//! scenarios.

#![allow(dead_code)]

pub mod assertions;
pub mod clock;
pub mod workspace;

// Re-export commonly used types
pub use assertions::{Assertion, ClickMatch};
pub use scenario::Scenario;
