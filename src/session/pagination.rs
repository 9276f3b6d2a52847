use std::ops::Range;

/// Questions shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Result of a page move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// Moved to this 1-indexed page.
    Moved(usize),
    /// Already on the first (for `previous`) or last (for `next`) page.
    AtBoundary,
}

/// Splits an ordered question list into fixed-size pages.
///
/// Pages are 1-indexed. An empty list still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    question_count: usize,
    current_page: usize,
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(question_count: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            question_count,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.question_count.div_ceil(self.page_size).max(1)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.total_pages()
    }

    /// Index range of `page` within the full question list.
    pub fn range_of(&self, page: usize) -> Range<usize> {
        let start = page.saturating_sub(1).saturating_mul(self.page_size);
        let end = page.saturating_mul(self.page_size);
        start.min(self.question_count)..end.min(self.question_count)
    }

    /// The items of the current page.
    pub fn current<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.page(self.current_page, items)
    }

    pub fn page<'a, T>(&self, page: usize, items: &'a [T]) -> &'a [T] {
        let range = self.range_of(page);
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    pub fn next(&mut self) -> PageStep {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            log::debug!("Moved to page {}/{}", self.current_page, self.total_pages());
            PageStep::Moved(self.current_page)
        } else {
            PageStep::AtBoundary
        }
    }

    pub fn previous(&mut self) -> PageStep {
        if self.current_page > 1 {
            self.current_page -= 1;
            log::debug!("Moved back to page {}/{}", self.current_page, self.total_pages());
            PageStep::Moved(self.current_page)
        } else {
            PageStep::AtBoundary
        }
    }

    pub fn reset(&mut self, question_count: usize) {
        self.question_count = question_count;
        self.current_page = 1;
    }
}
