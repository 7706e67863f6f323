use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_POST_PAGE_SIZE: u32 = 10;
pub const DEFAULT_COMMENT_PAGE_SIZE: u32 = 20;

/// Raw `?page=&page_size=` values. Kept as strings so that junk input
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self, default_page_size: u32) -> Page {
        let page = self
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .map_or(1, |page| page.min(u32::MAX as i64) as u32);

        let page_size = match self
            .page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
        {
            Some(size) if size > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
            Some(size) if size >= 1 => size as u32,
            _ => default_page_size,
        };

        Page { page, page_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: Page, total: i64) -> Self {
        let size = i64::from(page.page_size);
        Self {
            total,
            page: page.page,
            page_size: page.page_size,
            pages: (total + size - 1) / size,
        }
    }
}
