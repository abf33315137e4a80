use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::SearchRequest;
use crate::types::identifiers::PaperId;

/// A paper as the provider returns it, before it is stamped with the
/// search that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPaper {
    pub id: PaperId,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub pdf_url: String,
    pub published: NaiveDate,
    pub updated: Option<NaiveDate>,
    pub categories: Vec<String>,
    pub primary_category: String,
    pub entry_id: String,
}

/// Parameters of the search that first discovered a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryParams {
    pub query: String,
    pub sort_by: String,
    pub search_field: String,
    pub author_search: Option<String>,
    pub date_range: Option<String>,
}

impl DiscoveryParams {
    pub fn from_request(request: &SearchRequest) -> Self {
        let original = request.original();
        let date_range = match (present(original.date_from.as_deref()), present(original.date_to.as_deref())) {
            (None, None) => None,
            (from, to) => Some(format!("{} to {}", from.unwrap_or("*"), to.unwrap_or("*"))),
        };

        Self {
            query: original.query.clone(),
            sort_by: original.sort_by.clone(),
            search_field: original.search_field.clone(),
            author_search: original.author_search.clone(),
            date_range,
        }
    }
}

// Blank bounds count as absent.
fn present(bound: Option<&str>) -> Option<&str> {
    bound.map(str::trim).filter(|b| !b.is_empty())
}

/// A stored paper. The identifier is the registry key, not a field.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub pdf_url: String,
    pub published: String,
    pub updated: String,
    pub categories: Vec<String>,
    pub primary_category: String,
    pub entry_id: String,
    pub search_params: DiscoveryParams,
}

impl PaperRecord {
    /// Build the stored form of a fetched paper. `updated` falls back to
    /// `published` when the provider has none.
    pub fn discovered(paper: FetchedPaper, request: &SearchRequest) -> (PaperId, Self) {
        let published = paper.published.format("%Y-%m-%d").to_string();
        let updated = paper
            .updated
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| published.clone());

        let record = PaperRecord {
            title: paper.title,
            authors: paper.authors,
            summary: paper.summary,
            pdf_url: paper.pdf_url,
            published,
            updated,
            categories: paper.categories,
            primary_category: paper.primary_category,
            entry_id: paper.entry_id,
            search_params: DiscoveryParams::from_request(request),
        };
        (paper.id, record)
    }

    /// The 4-character year prefix of `published`.
    pub fn published_year(&self) -> &str {
        match self.published.char_indices().nth(4) {
            Some((ix, _)) => &self.published[..ix],
            None => &self.published,
        }
    }
}
