// Pagination state for a book list: offset tracking, exhaustion
// heuristic, randomized refresh offsets, failure rollback

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::domain::models::BookSummary;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_MAX_RANDOM_OFFSET: i64 = 500;

enum FetchMode {
    Replace,
    Append,
}

/// Owns the accumulated list for one browsing session. All mutation goes
/// through `reset`, `load_next_page` and `refresh`; the offset only moves
/// forward after a fetch comes back with a full page.
pub struct BookBrowser {
    catalog: Arc<dyn Catalog>,
    page_size: i64,
    max_random_offset: i64,
    books: Vec<BookSummary>,
    query: String,
    offset: i64,
    has_more: bool,
    loading: bool,
    loading_more: bool,
    last_error: Option<String>,
}

impl BookBrowser {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            page_size: DEFAULT_PAGE_SIZE,
            max_random_offset: DEFAULT_MAX_RANDOM_OFFSET,
            books: Vec::new(),
            query: String::new(),
            offset: 0,
            has_more: true,
            loading: false,
            loading_more: false,
            last_error: None,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_random_offset(mut self, max_random_offset: i64) -> Self {
        self.max_random_offset = max_random_offset;
        self
    }

    /// Seed the active query without fetching; the next `refresh` or
    /// `load_next_page` uses it.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_string();
        self
    }

    pub fn books(&self) -> &[BookSummary] {
        &self.books
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start over with a new query (blank selects the default feed) and
    /// fetch page 0. The previous list stays visible until a page
    /// arrives.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn reset(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.offset = 0;
        self.has_more = true;
        self.last_error = None;
        self.fetch_page(FetchMode::Replace).await;
    }

    /// Fetch the page at the current offset and append it. Dropped, not
    /// queued, while another load is in flight or after the list is
    /// exhausted.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_next_page(&mut self) {
        if self.loading_more || !self.has_more {
            return;
        }
        self.loading_more = true;
        self.fetch_page(FetchMode::Append).await;
        self.loading_more = false;
    }

    /// Refetch from offset 0, or from a random page-aligned offset when
    /// `randomized` is set. Consecutive randomized refreshes may land on
    /// the same page.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn refresh(&mut self, randomized: bool) {
        self.offset = if randomized { self.random_offset() } else { 0 };
        self.has_more = true;
        self.last_error = None;
        self.fetch_page(FetchMode::Replace).await;
    }

    async fn fetch_page(&mut self, mode: FetchMode) {
        self.loading = true;
        let result = if self.query.is_empty() {
            self.catalog.default_books(self.page_size, self.offset).await
        } else {
            self.catalog
                .search(&self.query, self.page_size, self.offset)
                .await
        };
        match result {
            Ok(page) => {
                let full_page = page.len() as i64 >= self.page_size;
                self.has_more = full_page;
                if full_page {
                    self.offset += self.page_size;
                }
                match mode {
                    FetchMode::Replace => self.books = page,
                    FetchMode::Append => self.books.extend(page),
                }
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, offset = self.offset, "page fetch failed");
                self.last_error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    fn random_offset(&self) -> i64 {
        let max_pages = self.max_random_offset / self.page_size;
        if max_pages <= 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..max_pages) * self.page_size
    }
}
