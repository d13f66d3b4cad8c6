//! Configuration management for lansweep.
//!
//! Settings come from an optional JSON file; command-line flags override
//! them.

mod settings;

pub use settings::{AppSettings, Paths};
