//! Deduplicating local cache for literature-index searches.
//!
//! `paper-cache` normalizes loose search parameters into a structured
//! provider query, fetches papers through a [`provider::PaperProvider`],
//! merges them into per-topic registries on disk (first write wins per
//! paper id) and renders the cache back as markdown. Identical inputs
//! always resolve to the same topic registry, and re-running a search
//! never overwrites what is already stored.

pub mod config;
pub mod paper;
pub mod projection;
pub mod provider;
pub mod query;
pub mod registry;
pub mod search;
pub mod types;

pub use config::Config;
pub use paper::{PaperId, PaperRecord};
pub use projection::ResultProjector;
pub use query::{SearchParams, SearchRequest};
pub use registry::RegistryStore;
pub use search::{SearchError, SearchOrchestrator, SearchSummary};
