//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `strum`).
//! Keep it lean: data, relations and defaults only, no I/O.

pub mod config;
pub mod constants;
pub mod environment;

pub use environment::Environment;
