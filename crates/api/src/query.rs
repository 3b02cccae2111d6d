//! Query-string types shared by listing handlers.

use grua_core::pagination::{
    clamp_page, clamp_page_size, page_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use serde::Deserialize;

/// Page-number pagination (`?page=&pageSize=`), 1-based.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Clamped `(limit, offset)` for the repository layer.
    pub fn limit_offset(&self) -> (i64, i64) {
        let size = clamp_page_size(self.page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let page = clamp_page(self.page);
        (size, page_offset(page, size))
    }
}
