use chrono::{Datelike, Days, Local, NaiveDate};

use crate::provider::PaperProvider;
use crate::query::{DateBound, SearchParams};
use crate::search::{SearchError, SearchOrchestrator, SearchSummary};

// Thin parameter builders over `SearchOrchestrator::search`.

pub fn author_params(author: &str, max_results: usize, sort_by: &str) -> SearchParams {
    SearchParams {
        query: "*".into(),
        max_results,
        sort_by: sort_by.into(),
        search_field: "author".into(),
        author_search: Some(author.into()),
        ..SearchParams::default()
    }
}

/// Window of `days_back` days ending on `today`, newest submissions first.
///
/// A window reaching before year 1 leaves the lower bound open.
pub fn recent_params(topic: &str, days_back: u32, max_results: usize, today: NaiveDate) -> SearchParams {
    let start = today
        .checked_sub_days(Days::new(u64::from(days_back)))
        .filter(|d| d.year() >= 1);
    SearchParams {
        query: topic.into(),
        max_results,
        sort_by: "submittedDate".into(),
        sort_order: "descending".into(),
        date_from: start.map(|d| DateBound::from_date(d).as_str().to_string()),
        date_to: Some(DateBound::from_date(today).as_str().to_string()),
        ..SearchParams::default()
    }
}

impl<P: PaperProvider> SearchOrchestrator<P> {
    pub fn search_by_author(
        &self,
        author: &str,
        max_results: usize,
        sort_by: &str,
    ) -> Result<SearchSummary, SearchError> {
        self.search(author_params(author, max_results, sort_by))
    }

    /// Recent papers on `topic`, dated by the local clock.
    pub fn search_recent(
        &self,
        topic: &str,
        days_back: u32,
        max_results: usize,
    ) -> Result<SearchSummary, SearchError> {
        self.search_recent_at(topic, days_back, max_results, Local::now().date_naive())
    }

    pub fn search_recent_at(
        &self,
        topic: &str,
        days_back: u32,
        max_results: usize,
        today: NaiveDate,
    ) -> Result<SearchSummary, SearchError> {
        self.search(recent_params(topic, days_back, max_results, today))
    }
}
