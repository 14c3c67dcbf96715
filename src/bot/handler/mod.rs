//! Framework callbacks: gateway readiness and command failures.

pub mod error;
pub mod ready;
