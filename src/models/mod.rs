//! Data models for chapter pagination
//!
//! This module defines the fragment tree that pagination operates on and
//! the configuration passed in from JavaScript.

pub mod config;
pub mod fragment;

// Re-export commonly used types
pub use config::*;
pub use fragment::*;
