//! Reading state around a paginated chapter

pub mod cursor;
pub mod page_height;

pub use cursor::PageCursor;
pub use page_height::{available_page_height, PageFrame, FOOTER_RESERVE, MIN_PAGE_HEIGHT};
