//! Chapter Pagination WASM Module
//!
//! Splits the HTML of a book chapter into pages that each fit a target
//! height, measuring content either in the live browser document or with
//! deterministic text metrics.

pub mod api;
pub mod html_layout;
pub mod models;
pub mod pagination;
pub mod parse;
pub mod reader;

// Re-export commonly used types
pub use html_layout::{
    DomMeasurer, LayoutMeasurer, MeasureError, MeasureScope, TextMetrics, TextMetricsMeasurer,
};
pub use models::{ConfigError, Element, Fragment, Node, PaginationConfig, DEFAULT_PAGE_HEIGHT};
pub use pagination::{Content, PaginationEngine};
pub use reader::{available_page_height, PageCursor, PageFrame};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            api::helpers::log_warn("logger already initialized");
        }
    }

    log::info!("Chapter pagination WASM module initialized");
}
