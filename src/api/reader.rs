//! Page reader for the WASM API
//!
//! Holds one chapter's pages and the current page so the reading view does
//! not keep its own counters.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, page_height_arg, pages_to_array};
use crate::api::pagination::paginate_in_document;
use crate::reader::PageCursor;

#[wasm_bindgen]
pub struct PageReader {
    cursor: PageCursor,
}

#[wasm_bindgen]
impl PageReader {
    /// Create a reader over an array of page HTML strings
    #[wasm_bindgen(constructor)]
    pub fn new(pages: JsValue) -> Result<PageReader, JsValue> {
        let pages: Vec<String> = if pages.is_undefined() || pages.is_null() {
            Vec::new()
        } else {
            deserialize(pages, "Pages must be an array of strings")?
        };
        Ok(PageReader {
            cursor: PageCursor::new(pages),
        })
    }

    /// Paginate chapter markup in the live document and open it on page 1
    #[wasm_bindgen(js_name = fromContent)]
    pub fn from_content(
        content: Option<String>,
        page_height: Option<f64>,
        config: JsValue,
    ) -> Result<PageReader, JsValue> {
        let pages = paginate_in_document(content.as_deref(), page_height_arg(page_height), config)?;
        Ok(PageReader {
            cursor: PageCursor::new(pages),
        })
    }

    #[wasm_bindgen(getter, js_name = currentPage)]
    pub fn current_page(&self) -> usize {
        self.cursor.current_page()
    }

    #[wasm_bindgen(getter, js_name = totalPages)]
    pub fn total_pages(&self) -> usize {
        self.cursor.total_pages()
    }

    /// HTML of the current page
    #[wasm_bindgen(getter, js_name = currentMarkup)]
    pub fn current_markup(&self) -> String {
        self.cursor.current_markup().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn pages(&self) -> js_sys::Array {
        pages_to_array(self.cursor.pages())
    }

    /// Jump to a 1-based page, clamped to the chapter; returns the page shown
    #[wasm_bindgen(js_name = goToPage)]
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.cursor.go_to(page)
    }

    /// Returns false on the last page
    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) -> bool {
        self.cursor.next()
    }

    /// Returns false on the first page
    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&mut self) -> bool {
        self.cursor.prev()
    }

    #[wasm_bindgen(getter, js_name = isFirst)]
    pub fn is_first(&self) -> bool {
        self.cursor.is_first()
    }

    #[wasm_bindgen(getter, js_name = isLast)]
    pub fn is_last(&self) -> bool {
        self.cursor.is_last()
    }

    /// Page indicator text, e.g. "3 / 7"
    pub fn label(&self) -> String {
        self.cursor.label()
    }
}
