//! Analysis Configuration Module
//!
//! ORC constants, output workbook names and default method flags, loaded
//! from TOML.
//!
//! ## Loading Order
//!
//! 1. `ORC_CONFIG` environment variable (path to TOML file)
//! 2. `orc_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly into each pipeline call; nothing in
//! the library reads it from ambient state.

mod analysis_config;
pub mod validation;

pub use analysis_config::*;
