//! Shared test support utilities for behaviour-driven suites.
//!
//! Exposes `StepValue`, which strips the quotes scenario text wraps around
//! categories, patterns, and language codes.
pub mod step;
