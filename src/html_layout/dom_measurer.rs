//! Browser-backed measurement
//!
//! Lays fragments out in a hidden container attached to `document.body`,
//! constrained to the page width so reported heights match the real page.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

use super::measure::{LayoutMeasurer, MeasureError, MeasureScope};
use super::parse_px;
use crate::models::{Node, PaginationConfig};

impl From<JsValue> for MeasureError {
    fn from(value: JsValue) -> Self {
        MeasureError::Host(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// `LayoutMeasurer` that asks the browser for `offsetHeight`
#[derive(Clone, Debug)]
pub struct DomMeasurer {
    width: f32,
    class: String,
}

impl DomMeasurer {
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            width: config.measure_width,
            class: config.measure_class.clone(),
        }
    }

    fn container_css(&self) -> String {
        format!(
            "position: absolute; visibility: hidden; width: 100%; max-width: {}px; \
             padding: 0; margin: 0; left: -9999px; top: 0;",
            self.width
        )
    }
}

impl LayoutMeasurer for DomMeasurer {
    type Scope = DomMeasureScope;

    fn open_scope(&self) -> Result<DomMeasureScope, MeasureError> {
        let window = web_sys::window().ok_or(MeasureError::NoDocument)?;
        let document: Document = window.document().ok_or(MeasureError::NoDocument)?;
        let body = document.body().ok_or(MeasureError::NoDocument)?;

        let container: HtmlElement = document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| MeasureError::Host("measurement container is not an HTMLElement".into()))?;
        container.set_class_name(&self.class);
        container.style().set_css_text(&self.container_css());
        body.append_child(&container)?;

        log::trace!("measurement container attached ({}px)", self.width);
        Ok(DomMeasureScope { window, container })
    }
}

/// A hidden container in the live document; removed on drop
pub struct DomMeasureScope {
    window: Window,
    container: HtmlElement,
}

impl DomMeasureScope {
    /// Render `node` alone in the container; returns its element, if any
    fn render(&self, node: &Node) -> Result<Option<HtmlElement>, MeasureError> {
        self.container.set_inner_html(&node.to_html());
        match node {
            Node::Text(_) => Ok(None),
            Node::Element(_) => match self.container.first_element_child() {
                Some(el) => Ok(el.dyn_into::<HtmlElement>().ok()),
                None => Ok(None),
            },
        }
    }
}

impl MeasureScope for DomMeasureScope {
    fn height(&mut self, node: &Node) -> Result<f32, MeasureError> {
        let height = match self.render(node)? {
            Some(el) => el.offset_height(),
            None => self.container.offset_height(),
        };
        Ok(height as f32)
    }

    fn vertical_margin(&mut self, node: &Node) -> Result<f32, MeasureError> {
        let Some(el) = self.render(node)? else {
            return Ok(0.0);
        };
        let Some(style) = self.window.get_computed_style(&el)? else {
            return Ok(0.0);
        };
        let top = style.get_property_value("margin-top")?;
        let bottom = style.get_property_value("margin-bottom")?;
        Ok(parse_px(&top).unwrap_or(0.0) + parse_px(&bottom).unwrap_or(0.0))
    }
}

impl Drop for DomMeasureScope {
    fn drop(&mut self) {
        self.container.remove();
        log::trace!("measurement container removed");
    }
}
