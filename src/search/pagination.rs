//! Numbered pagination over a known total.

use std::{fmt, num::NonZeroU32};

use serde::Serialize;

/// Pages beyond this count are windowed around the current page.
const FULL_WINDOW_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current_page: u32,
    pub page_size: NonZeroU32,
    pub total_count: u64,
}

impl PageWindow {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_count: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.page_size.get()));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// True when `page` names an existing page.
    pub fn accepts(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    /// Pull `current_page` back into `1..=max(total_pages, 1)`.
    pub fn clamp(&mut self) {
        let last = self.total_pages().max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size.get())
    }

    pub fn items(&self) -> Vec<PageItem> {
        page_window(self.current_page, self.total_pages())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{page}"),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// Page links to show for `current` out of `total_pages`.
///
/// Up to five pages are listed in full. Past that: the first and last page,
/// up to three pages around `current`, and an ellipsis at each gap.
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= FULL_WINDOW_LIMIT {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total_pages - 1);
    if current <= 2 {
        end = 4;
    }
    if current >= total_pages - 1 {
        start = total_pages - 3;
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if current + 2 < total_pages {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total_pages));
    items
}
