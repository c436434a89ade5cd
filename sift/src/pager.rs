use std::ops::Range;

use log::debug;

use crate::config::SearchSettings;
use crate::errors::Degradation;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of results: the clamped request plus its skip/take window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: u64,
    pub page_size: u64,
    pub skip: usize,
    pub take: usize,
}

impl Window {
    /// Index range of this window within a sequence of `len` records.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.skip.min(len);
        let end = start.saturating_add(self.take).min(len);
        start..end
    }
}

/// Clamps paging requests and turns them into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    default_page_size: u64,
    max_page_size: u64,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Pager {
    /// The maximum is itself capped at [`MAX_PAGE_SIZE`], and the default
    /// page size is kept within `1..=max`.
    pub fn new(default_page_size: u64, max_page_size: u64) -> Self {
        let max_page_size = max_page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(settings.default_page_size, settings.max_page_size)
    }

    #[inline]
    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    #[inline]
    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Clamp `page` to at least 1 and `page_size` to `1..=max`, never failing.
    pub fn window(&self, page: i64, page_size: i64) -> Window {
        let max = i64::try_from(self.max_page_size).unwrap_or(i64::MAX);
        let clamped_page = page.max(1);
        let clamped_size = page_size.clamp(1, max);
        if clamped_page != page || clamped_size != page_size {
            debug!(
                "{}; clamped to page={} page_size={}",
                Degradation::OutOfRangePaging { page, page_size },
                clamped_page,
                clamped_size
            );
        }

        let page = clamped_page.unsigned_abs();
        let page_size = clamped_size.unsigned_abs();
        let skip = (page - 1).saturating_mul(page_size);

        Window {
            page,
            page_size,
            skip: usize::try_from(skip).unwrap_or(usize::MAX),
            take: usize::try_from(page_size).unwrap_or(usize::MAX),
        }
    }

    /// Like [`Pager::window`], filling in the first page and the configured
    /// default page size for missing values.
    pub fn window_or_default(&self, page: Option<i64>, page_size: Option<i64>) -> Window {
        let default_size = i64::try_from(self.default_page_size).unwrap_or(i64::MAX);
        self.window(page.unwrap_or(DEFAULT_PAGE as i64), page_size.unwrap_or(default_size))
    }
}

/// Window for `page`/`page_size` under the default bounds (`1..=100`).
pub fn window(page: i64, page_size: i64) -> Window {
    Pager::default().window(page, page_size)
}
