//! Backend test support utilities
//!
//! Logging initialization, problem+json assertions and unique test data,
//! shared by unit and integration tests without depending on backend types.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
