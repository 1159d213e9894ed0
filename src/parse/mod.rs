//! Parsing module for chapter markup
//!
//! Converts HTML strings into the fragment tree used by pagination.

pub mod markup;

pub use markup::parse_markup;
