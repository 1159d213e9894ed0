//! Chapter Pagination WASM API
//!
//! The JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and the serde bridge
//! - `pagination`: `paginate`, `paginateHeadless`, `availablePageHeight`
//! - `reader`: the `PageReader` class

pub mod helpers;
pub mod pagination;
pub mod reader;

pub use pagination::{available_page_height, default_pagination_config, paginate, paginate_headless};
pub use reader::PageReader;
