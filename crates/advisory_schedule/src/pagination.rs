// --- File: crates/advisory_schedule/src/pagination.rs ---
//! Fixed-size pages over the slot sequence.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// `max(1, ceil(len / page_size))`. A zero page size is treated as 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// One page cut out of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView<'a, T> {
    pub items: &'a [T],
    pub page_count: usize,
    pub current_page: usize,
}

/// Cuts page `current_page` out of `sequence`, clamping the index to the last page.
pub fn paginate<T>(sequence: &[T], page_size: usize, current_page: usize) -> PageView<'_, T> {
    let page_size = page_size.max(1);
    let page_count = page_count(sequence.len(), page_size);
    let current_page = current_page.min(page_count - 1);
    let start = (current_page * page_size).min(sequence.len());
    let end = (start + page_size).min(sequence.len());

    PageView {
        items: &sequence[start..end],
        page_count,
        current_page,
    }
}

/// Navigation actions offered by the widget's pager.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
}

/// Tracks the current page over a sequence of known length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    len: usize,
    current: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            len: 0,
            current: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        page_count(self.len, self.page_size)
    }

    fn last_index(&self) -> usize {
        self.page_count() - 1
    }

    /// The underlying sequence was replaced: back to page 0.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.current = 0;
    }

    /// The underlying sequence grew or shrank: keep the page, clamped.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.current = self.current.min(self.last_index());
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1).min(self.last_index());
    }

    pub fn last(&mut self) {
        self.current = self.last_index();
    }

    pub fn navigate(&mut self, nav: PageNav) {
        match nav {
            PageNav::First => self.first(),
            PageNav::Prev => self.prev(),
            PageNav::Next => self.next(),
            PageNav::Last => self.last(),
        }
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.last_index()
    }

    /// Index range of the current page within the sequence.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current * self.page_size).min(self.len);
        start..(start + self.page_size).min(self.len)
    }

    /// The current page of `items`. `items` is expected to have `len()` elements.
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page_size, self.current).items
    }
}
