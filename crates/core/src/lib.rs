//! Domain types and pure logic shared by the Parlance crates.
//!
//! Nothing here performs I/O: practice-option validation, progress
//! summaries and the shared error type live here so the HTTP layer and
//! the provider clients agree on them.

pub mod error;
pub mod practice;
pub mod progress;
pub mod types;
