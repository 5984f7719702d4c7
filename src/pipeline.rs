use log::info;

use crate::fetcher::{FetchQuery, PageFetcher};
use crate::filter::FilterCriteria;
use crate::paginator::Paginator;
use crate::record::JobRecord;
use crate::stats::ZoneStats;

/// Ordering key the listing API understands for "most recent first".
pub const ORDER_BY_PUBLISHED: &str = "publishedAt";

/// Collect, then filter, then optionally aggregate. Every command is one of
/// these with a different query and criteria.
pub struct Pipeline<F> {
    paginator: Paginator<F>,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(paginator: Paginator<F>) -> Self {
        Pipeline { paginator }
    }

    pub fn paginator(&self) -> &Paginator<F> {
        &self.paginator
    }

    /// The cap bounds what is fetched; filtering happens afterwards, so the
    /// result can be shorter than `max_results`.
    pub fn run(&self, query: &FetchQuery, criteria: &FilterCriteria, max_results: Option<usize>) -> Vec<JobRecord> {
        let collected = self.paginator.collect(query, max_results);
        let fetched = collected.len();
        let kept = criteria.apply(collected);
        info!("{} of {} fetched jobs matched", kept.len(), fetched);
        kept
    }

    pub fn statistics(&self, query: &FetchQuery, criteria: &FilterCriteria, max_results: Option<usize>) -> ZoneStats {
        let records = self.run(query, criteria, max_results);
        let stats = ZoneStats::from_records(&records);
        info!("{} zone/type pairs across {} jobs", stats.len(), records.len());
        stats
    }

    pub fn top(&self, n: usize) -> Vec<JobRecord> {
        let query = FetchQuery::new().order_by(ORDER_BY_PUBLISHED);
        self.run(&query, &FilterCriteria::new(), Some(n))
    }
}
