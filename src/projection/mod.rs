pub mod index;
pub mod topic;

use tracing::warn;

use crate::paper::PaperId;
use crate::registry::{Lookup, RegistryStore};
use crate::types::identifiers::TopicSlug;

pub use topic::{truncate_summary, AUTHOR_LIMIT, SUMMARY_LIMIT};

/// Read-only markdown views over a [`RegistryStore`].
///
/// Every method returns text; storage problems become explanatory
/// messages rather than errors.
pub struct ResultProjector<'a> {
    store: &'a RegistryStore,
}

impl<'a> ResultProjector<'a> {
    pub fn new(store: &'a RegistryStore) -> Self {
        Self { store }
    }

    /// Table of every known topic with its record count.
    pub fn render_topic_index(&self) -> String {
        let topics = self.store.topics().unwrap_or_else(|e| {
            warn!(root = %self.store.root().display(), error = %e, "cannot list topics");
            Vec::new()
        });
        index::render_index(self.store.root(), &topics)
    }

    /// Records of one topic grouped by publication year, newest first.
    ///
    /// `topic` is either a slug as listed by the index (case kept) or a
    /// readable topic name such as `Machine Learning`.
    pub fn render_topic(&self, topic: &str) -> String {
        let slug = TopicSlug::from_listed(topic)
            .filter(|listed| self.store.registry_path(listed).is_file())
            .unwrap_or_else(|| TopicSlug::from_topic_name(topic));
        match self.store.load_lenient(&slug) {
            Some(registry) if !registry.is_empty() => {
                topic::render_topic(&slug, &self.store.registry_path(&slug), &registry)
            }
            _ => topic::render_missing(topic),
        }
    }

    /// A stored record as pretty JSON, or a not-found message.
    pub fn render_lookup(&self, id: &str) -> String {
        let id = PaperId::new(id.trim());
        let lookup = self.store.lookup(&id).unwrap_or_else(|e| {
            warn!(id = %id, error = %e, "lookup failed");
            Lookup::NotFound
        });

        match lookup {
            Lookup::Found { record, .. } => serde_json::to_string_pretty(&record)
                .unwrap_or_else(|e| format!("Stored record for paper {id} could not be rendered: {e}")),
            Lookup::NotFound => format!("No saved information found for paper {id}."),
            Lookup::NoData => format!(
                "Papers directory {} does not exist. No saved papers found.",
                self.store.root().display()
            ),
        }
    }
}
