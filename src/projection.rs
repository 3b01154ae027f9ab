//! Paginated, query-filtered views over ordered collections.
//!
//! The window grows in whole pages and never shrinks. A non-empty query
//! filters only the items already shown, and while a query is active the
//! window cannot grow.

use crate::constants::paging::MAX_QUERY_LEN;
use crate::stake::{rank_stakers, RankedStaker, StakerRow};

/// The field free-text queries match against (tx hash, staker address, ...).
pub trait SearchKey {
    fn search_key(&self) -> &str;
}

#[derive(Clone, Debug)]
pub struct ListProjection<T> {
    items: Vec<T>,
    page_size: usize,
    shown: usize,
    query: String,
}

impl<T: SearchKey> ListProjection<T> {
    /// Start with the first page shown. A zero page size is treated as one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let shown = page_size.min(items.len());
        Self {
            items,
            page_size,
            shown,
            query: String::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn shown_len(&self) -> usize {
        self.shown
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Items in the current window, unfiltered.
    pub fn shown(&self) -> &[T] {
        &self.items[..self.shown]
    }

    /// Extend the window to the end of the next page. Returns whether anything
    /// was added; a no-op once everything is shown or while a query is active.
    pub fn load_more(&mut self) -> bool {
        if !self.query.is_empty() || self.shown >= self.items.len() {
            return false;
        }
        let next_page = self.shown / self.page_size + 1;
        let before = self.shown;
        self.shown = self.items.len().min(self.page_size * next_page);
        log::debug!(
            "[projection] load_more {} -> {} of {}",
            before,
            self.shown,
            self.items.len()
        );
        self.shown > before
    }

    /// Set the free-text query (trimmed, capped at `MAX_QUERY_LEN` chars).
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().chars().take(MAX_QUERY_LEN).collect();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Whether "load more" should be offered: more items exist and no query is active.
    pub fn can_load_more(&self) -> bool {
        self.query.is_empty() && self.shown < self.items.len()
    }

    /// The shown window filtered by substring match on the search key.
    pub fn visible(&self) -> Vec<&T> {
        let window = self.shown().iter();
        if self.query.is_empty() {
            window.collect()
        } else {
            window
                .filter(|item| item.search_key().contains(self.query.as_str()))
                .collect()
        }
    }
}

impl ListProjection<StakerRow> {
    /// Visible stakers with shares recomputed over the visible set only.
    pub fn ranked(&self) -> Vec<RankedStaker> {
        rank_stakers(self.visible())
    }
}
