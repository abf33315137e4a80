use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::query::fields::{FieldScope, SortDirection, SortKey};
use crate::types::identifiers::TopicSlug;

/// Provider ceiling on results per search.
pub const MAX_RESULTS_LIMIT: usize = 30_000;

/// Loosely-typed search parameters as a caller hands them in.
///
/// Nothing here is validated; see [`SearchRequest::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[serde(rename(serialize = "original_query", deserialize = "query"), alias = "original_query")]
    pub query: String,
    pub max_results: usize,
    pub sort_by: String,
    pub sort_order: String,
    pub search_field: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub author_search: Option<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 5,
            sort_by: "relevance".into(),
            sort_order: "descending".into(),
            search_field: "all".into(),
            date_from: None,
            date_to: None,
            author_search: None,
        }
    }
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// A validated `YYYYMMDD` date bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBound(String);

impl DateBound {
    /// Accepts exactly 8 ASCII digits that form a real calendar date.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y%m%d").ok()?;
        Some(DateBound(s.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DateBound(date.format("%Y%m%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalized, immutable search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    raw_query: String,
    field_scope: FieldScope,
    sort_key: SortKey,
    sort_direction: SortDirection,
    author_filter: Option<String>,
    date_from: Option<DateBound>,
    date_to: Option<DateBound>,
    max_results: usize,
    provider_query: String,
    original: SearchParams,
}

impl SearchRequest {
    /// Normalize loose parameters. Never fails: unknown enum strings fall
    /// back to their defaults and malformed dates are dropped.
    pub fn normalize(params: SearchParams) -> Self {
        let field_scope = FieldScope::parse_lenient(&params.search_field);
        let sort_key = SortKey::parse_lenient(&params.sort_by);
        let sort_direction = SortDirection::parse_lenient(&params.sort_order);
        let max_results = params.max_results.clamp(1, MAX_RESULTS_LIMIT);

        let author_filter = params
            .author_search
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let date_from = date_bound("date_from", params.date_from.as_deref());
        let date_to = date_bound("date_to", params.date_to.as_deref());

        let provider_query = build_provider_query(
            &params.query,
            field_scope,
            author_filter.as_deref(),
            date_from.as_ref(),
            date_to.as_ref(),
        );

        Self {
            raw_query: params.query.clone(),
            field_scope,
            sort_key,
            sort_direction,
            author_filter,
            date_from,
            date_to,
            max_results,
            provider_query,
            original: params,
        }
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn field_scope(&self) -> FieldScope {
        self.field_scope
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn author_filter(&self) -> Option<&str> {
        self.author_filter.as_deref()
    }

    pub fn date_from(&self) -> Option<&DateBound> {
        self.date_from.as_ref()
    }

    pub fn date_to(&self) -> Option<&DateBound> {
        self.date_to.as_ref()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// The structured query string sent to the provider.
    pub fn provider_query(&self) -> &str {
        &self.provider_query
    }

    /// Parameters exactly as the caller supplied them.
    pub fn original(&self) -> &SearchParams {
        &self.original
    }

    pub fn topic_slug(&self) -> TopicSlug {
        TopicSlug::derive(&self.raw_query, self.author_filter.as_deref())
    }
}

/// Free-function form of [`SearchRequest::normalize`].
pub fn normalize(params: SearchParams) -> SearchRequest {
    SearchRequest::normalize(params)
}

fn date_bound(name: &str, raw: Option<&str>) -> Option<DateBound> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let bound = DateBound::parse(raw);
    if bound.is_none() {
        warn!(param = name, value = raw, "ignoring malformed date bound, expected YYYYMMDD");
    }
    bound
}

fn build_provider_query(
    query: &str,
    scope: FieldScope,
    author: Option<&str>,
    from: Option<&DateBound>,
    to: Option<&DateBound>,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    // An `all:` prefix on multi-word text is rejected by the provider.
    match scope.prefix() {
        Some(prefix) => parts.push(format!("{prefix}:{query}")),
        None => parts.push(query.to_string()),
    }

    if let Some(author) = author {
        parts.push(format!("au:{}", author.replace(' ', "_").to_lowercase()));
    }

    if from.is_some() || to.is_some() {
        let lo = from.map(|d| format!("{}0000", d.as_str())).unwrap_or_else(|| "*".into());
        let hi = to.map(|d| format!("{}2359", d.as_str())).unwrap_or_else(|| "*".into());
        parts.push(format!("submittedDate:[{lo} TO {hi}]"));
    }

    parts.join(" AND ")
}
