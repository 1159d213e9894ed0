//! Pagination operations for the WASM API
//!
//! - `paginate`: split chapter markup using the live document for measurement
//! - `paginateHeadless`: the same split using text metrics, no DOM needed
//! - `availablePageHeight`: page height left inside a reading container
//! - `defaultPaginationConfig`: the configuration used when none is given

use wasm_bindgen::prelude::*;

use crate::api::helpers::{
    deserialize_or_default, log_error, page_height_arg, pages_to_array, serialize,
};
use crate::html_layout::{DomMeasurer, TextMetrics, TextMetricsMeasurer};
use crate::models::PaginationConfig;
use crate::pagination::PaginationEngine;
use crate::reader::PageFrame;
use crate::{wasm_info, wasm_log};

/// Split chapter markup into pages measured in the browser
///
/// # Parameters
/// * `content` - chapter HTML; `undefined`/`null` give a single empty page
/// * `page_height` - page budget in pixels; falls back to the configured default
/// * `config` - optional `PaginationConfig` object (camelCase keys), or the
///   same object as a JSON string
///
/// # Returns
/// Array of page HTML strings, never empty
#[wasm_bindgen(js_name = paginate)]
pub fn paginate(
    content: Option<String>,
    page_height: Option<f64>,
    config: JsValue,
) -> Result<js_sys::Array, JsValue> {
    let pages = paginate_in_document(content.as_deref(), page_height_arg(page_height), config)?;
    Ok(pages_to_array(&pages))
}

/// Split chapter markup into pages using estimated text metrics
///
/// `metrics` is an optional `TextMetrics` object (camelCase keys).
#[wasm_bindgen(js_name = paginateHeadless)]
pub fn paginate_headless(
    content: Option<String>,
    page_height: Option<f64>,
    metrics: JsValue,
    config: JsValue,
) -> Result<js_sys::Array, JsValue> {
    let metrics: TextMetrics = deserialize_or_default(metrics, "Invalid text metrics")?;
    let config = config_arg(config)?;

    wasm_log!(
        "paginateHeadless: {} bytes, {} chars per line",
        content.as_deref().map_or(0, str::len),
        metrics.chars_per_line
    );
    let engine = PaginationEngine::with_config(TextMetricsMeasurer::new(metrics), config);
    let pages = engine.paginate(content.as_deref(), page_height_arg(page_height));

    Ok(pages_to_array(&pages))
}

/// The configuration `paginate` uses when called without one
#[wasm_bindgen(js_name = defaultPaginationConfig)]
pub fn default_pagination_config() -> Result<JsValue, JsValue> {
    serialize(&PaginationConfig::default(), "Failed to serialize config")
}

/// Page height left for content inside a container of the given size
#[wasm_bindgen(js_name = availablePageHeight)]
pub fn available_page_height(container_height: f64, padding_top: f64, padding_bottom: f64) -> f64 {
    let frame = PageFrame::new(
        container_height as f32,
        padding_top as f32,
        padding_bottom as f32,
    );
    crate::reader::available_page_height(Some(&frame)) as f64
}

/// Paginate with the DOM measurer; only the config can fail
pub(crate) fn paginate_in_document(
    content: Option<&str>,
    page_height: Option<f32>,
    config: JsValue,
) -> Result<Vec<String>, JsValue> {
    let config = config_arg(config)?;

    wasm_log!(
        "paginate: {} bytes, page height {:?}",
        content.map_or(0, str::len),
        page_height
    );
    let engine = PaginationEngine::with_config(DomMeasurer::new(&config), config);
    let pages = engine.paginate(content, page_height);

    wasm_info!("paginate produced {} pages", pages.len());
    Ok(pages)
}

/// Config from JavaScript: an object, a JSON string, or nothing
fn config_arg(value: JsValue) -> Result<PaginationConfig, JsValue> {
    match value.as_string() {
        Some(json) => PaginationConfig::from_json(&json).map_err(|e| {
            log_error(&e.to_string());
            JsValue::from_str(&e.to_string())
        }),
        None => deserialize_or_default(value, "Invalid pagination config"),
    }
}
