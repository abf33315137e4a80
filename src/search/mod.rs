pub mod wrappers;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::paper::{PaperId, PaperRecord};
use crate::provider::{PaperProvider, ProviderError};
use crate::query::{SearchParams, SearchRequest};
use crate::registry::{RegistryError, RegistryStore};
use crate::types::identifiers::{RegistryVersion, TopicSlug};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search failed at provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("Could not store results: {0}")]
    Registry(#[from] RegistryError),
}

/// What a search did, as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub paper_ids: Vec<PaperId>,
    pub total_found: usize,
    pub new_papers: usize,
    pub search_query: String,
    pub search_parameters: SearchParams,
    pub topic: TopicSlug,
    pub storage_path: PathBuf,
    pub registry_version: RegistryVersion,
    pub message: String,
}

/// Normalize, fetch, merge.
pub struct SearchOrchestrator<P> {
    provider: P,
    store: RegistryStore,
}

impl<P: PaperProvider> SearchOrchestrator<P> {
    pub fn new(provider: P, store: RegistryStore) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one search and merge its results into the topic's registry.
    ///
    /// A provider failure leaves the registry untouched.
    pub fn search(&self, params: SearchParams) -> Result<SearchSummary, SearchError> {
        let request = SearchRequest::normalize(params);
        let slug = request.topic_slug();
        debug!(
            provider = self.provider.name(),
            query = request.provider_query(),
            slug = %slug,
            max_results = request.max_results(),
            "searching"
        );

        let fetched = self.provider.fetch(&request)?;
        let incoming: Vec<(PaperId, PaperRecord)> = fetched
            .into_iter()
            .map(|paper| PaperRecord::discovered(paper, &request))
            .collect();

        let outcome = self.store.merge(&slug, incoming)?;

        let total_found = outcome.paper_ids.len();
        let message = format!(
            "Found {} papers ({} new). Results saved to {}",
            total_found,
            outcome.new_count,
            outcome.path.display()
        );
        info!(slug = %slug, found = total_found, new = outcome.new_count, "search complete");

        Ok(SearchSummary {
            paper_ids: outcome.paper_ids,
            total_found,
            new_papers: outcome.new_count,
            search_query: request.provider_query().to_string(),
            search_parameters: request.original().clone(),
            topic: outcome.slug,
            storage_path: outcome.path,
            registry_version: outcome.version,
            message,
        })
    }
}
