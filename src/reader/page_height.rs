//! Page height available to chapter content

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_PAGE_HEIGHT;

/// Space kept free under the content for the page footer
pub const FOOTER_RESERVE: f32 = 40.0;

/// Smallest page height ever handed to pagination
pub const MIN_PAGE_HEIGHT: f32 = 200.0;

/// Dimensions of the element pages are displayed in
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageFrame {
    pub container_height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
}

impl PageFrame {
    pub fn new(container_height: f32, padding_top: f32, padding_bottom: f32) -> Self {
        Self {
            container_height,
            padding_top,
            padding_bottom,
        }
    }

    pub fn available_height(&self) -> f32 {
        let height =
            self.container_height - self.padding_top - self.padding_bottom - FOOTER_RESERVE;
        if height.is_finite() {
            height.max(MIN_PAGE_HEIGHT)
        } else {
            MIN_PAGE_HEIGHT
        }
    }
}

/// Height to paginate for; the default page height when there is no frame
pub fn available_page_height(frame: Option<&PageFrame>) -> f32 {
    frame.map_or(DEFAULT_PAGE_HEIGHT, PageFrame::available_height)
}
