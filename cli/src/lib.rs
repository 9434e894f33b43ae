//! Lexis command-line library.
//!
//! This crate backs the `lexis` binary: argument parsing, command dispatch,
//! and output formatting over the `lexis` translation library. It is split
//! from the binary so commands can be exercised against a temporary catalogue
//! root in tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Command dispatch against a configured translator
//! - [`error`] - CLI error type
//! - [`output`] - Human-readable rendering of reports and catalogues

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
