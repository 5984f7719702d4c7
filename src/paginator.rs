use log::{error, info};

use crate::config::{DEFAULT_PAGE_SIZE, UNBOUNDED};
use crate::delay_manager::PageDelay;
use crate::error::FetchError;
use crate::fetcher::{FetchQuery, PageFetcher};
use crate::record::JobRecord;

#[derive(Debug)]
pub enum StopReason {
    LimitReached,
    Exhausted,
    Failed(FetchError),
}

#[derive(Debug)]
pub struct Collection {
    pub records: Vec<JobRecord>,
    pub pages_requested: usize,
    pub stop: StopReason,
}

/// Drives a [`PageFetcher`] page by page until the cap is hit or the source
/// runs dry. A failed page ends the run with what was already collected; there
/// is no retry.
pub struct Paginator<F> {
    fetcher: F,
    page_size: usize,
    delay: PageDelay,
}

impl<F: PageFetcher> Paginator<F> {
    pub fn new(fetcher: F) -> Self {
        Paginator {
            fetcher,
            page_size: DEFAULT_PAGE_SIZE,
            delay: PageDelay::disabled(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_delay(mut self, delay: PageDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Records in page-then-source order, never more than `max_results`.
    pub fn collect(&self, base: &FetchQuery, max_results: Option<usize>) -> Vec<JobRecord> {
        self.collect_detailed(base, max_results).records
    }

    pub fn collect_detailed(&self, base: &FetchQuery, max_results: Option<usize>) -> Collection {
        let max_results = max_results.unwrap_or(UNBOUNDED);
        let mut records = Vec::new();
        let mut page = 1;

        if max_results == 0 {
            return Collection { records, pages_requested: 0, stop: StopReason::LimitReached };
        }

        let stop = loop {
            if page > 1 {
                self.delay.wait();
            }

            let query = base.clone().limit(self.page_size).page(page);
            match self.fetcher.fetch(&query) {
                Ok(result) => {
                    let has_more = result.has_more();
                    info!("Page {}: {} records", page, result.records.len());
                    records.extend(result.records);

                    if records.len() >= max_results {
                        break StopReason::LimitReached;
                    }
                    if !has_more {
                        break StopReason::Exhausted;
                    }
                }
                Err(e) => {
                    error!("Stopping pagination at page {}: {}", page, e);
                    break StopReason::Failed(e);
                }
            }
            page += 1;
        };

        records.truncate(max_results);
        info!("Collected {} records over {} pages ({:?})", records.len(), page, stop);

        Collection { records, pages_requested: page, stop }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::Page;
    use std::cell::RefCell;

    /// Serves `total` records in pages, optionally failing at one page number.
    struct FakeSource {
        total: usize,
        fail_at: Option<usize>,
        seen: RefCell<Vec<FetchQuery>>,
    }

    impl FakeSource {
        fn new(total: usize) -> Self {
            FakeSource { total, fail_at: None, seen: RefCell::new(Vec::new()) }
        }
    }

    impl PageFetcher for FakeSource {
        fn fetch(&self, query: &FetchQuery) -> Result<Page, FetchError> {
            self.seen.borrow_mut().push(query.clone());
            let page = query.page_number().unwrap();
            if self.fail_at == Some(page) {
                return Err(FetchError::Status(503));
            }
            let size = query.page_size().unwrap();
            let start = (page - 1) * size;
            let end = (start + size).min(self.total);
            let records = (start..end)
                .map(|i| JobRecord { id: i as i64, ..Default::default() })
                .collect();
            Ok(Page { records, more: true })
        }
    }

    #[test]
    fn truncates_overshooting_last_page() {
        let paginator = Paginator::new(FakeSource::new(100));
        let out = paginator.collect_detailed(&FetchQuery::new(), Some(25));
        assert_eq!(out.records.len(), 25);
        assert_eq!(out.pages_requested, 2);
        assert!(matches!(out.stop, StopReason::LimitReached));
    }

    #[test]
    fn short_source_returns_everything() {
        let paginator = Paginator::new(FakeSource::new(33));
        let out = paginator.collect_detailed(&FetchQuery::new(), None);
        assert_eq!(out.records.len(), 33);
        assert!(matches!(out.stop, StopReason::Exhausted));
        let ids: Vec<i64> = out.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..33).collect::<Vec<i64>>());
    }

    #[test]
    fn failure_keeps_partial_results() {
        let mut source = FakeSource::new(100);
        source.fail_at = Some(3);
        let paginator = Paginator::new(source);
        let out = paginator.collect_detailed(&FetchQuery::new(), Some(90));
        assert_eq!(out.records.len(), 40);
        assert!(matches!(out.stop, StopReason::Failed(FetchError::Status(503))));
        // no retry of the failed page
        assert_eq!(paginator.fetcher().seen.borrow().len(), 3);
    }

    #[test]
    fn zero_cap_makes_no_request() {
        let paginator = Paginator::new(FakeSource::new(10));
        assert!(paginator.collect(&FetchQuery::new(), Some(0)).is_empty());
        assert!(paginator.fetcher().seen.borrow().is_empty());
    }

    #[test]
    fn pages_requested_in_order_with_fixed_size() {
        let paginator = Paginator::new(FakeSource::new(50)).with_page_size(10);
        paginator.collect(&FetchQuery::new().order_by("publishedAt"), None);
        let seen = paginator.fetcher().seen.borrow();
        let pages: Vec<usize> = seen.iter().map(|q| q.page_number().unwrap()).collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5, 6]);
        assert!(seen.iter().all(|q| q.page_size() == Some(10)));
        assert!(seen.iter().all(|q| q.get("order_by") == Some("publishedAt")));
    }

    struct FinalPage;

    impl PageFetcher for FinalPage {
        fn fetch(&self, query: &FetchQuery) -> Result<Page, FetchError> {
            let size = query.page_size().unwrap();
            let records = (0..size).map(|i| JobRecord { id: i as i64, ..Default::default() }).collect();
            Ok(Page { records, more: false })
        }
    }

    #[test]
    fn full_page_without_more_stops_after_one_request() {
        let paginator = Paginator::new(FinalPage);
        let out = paginator.collect_detailed(&FetchQuery::new(), Some(100));
        assert_eq!(out.records.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(out.pages_requested, 1);
        assert!(matches!(out.stop, StopReason::Exhausted));
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(Paginator::new(FinalPage).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(Paginator::new(FinalPage).with_page_size(0).page_size(), 1);
    }

    #[test]
    fn never_exceeds_cap() {
        let paginator = Paginator::new(FakeSource::new(57)).with_page_size(7);
        for cap in 0..70 {
            let out = paginator.collect(&FetchQuery::new(), Some(cap));
            assert_eq!(out.len(), cap.min(57));
        }
    }
}
