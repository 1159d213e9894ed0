//! Chapter pagination
//!
//! `PaginationEngine` turns chapter markup into page markup using any
//! `LayoutMeasurer`; `packer` holds the greedy packing and the split
//! strategies for oversized elements.

pub mod engine;
pub mod packer;
pub mod sentences;

pub use engine::{Content, PaginationEngine};
pub use packer::{Packer, SplitStrategy};
pub use sentences::{sentence_runs, split_sentences};
