//! # Core Utilities
//!
//! Helpers shared by the session and token modules.

pub mod generate;
