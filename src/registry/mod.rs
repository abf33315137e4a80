pub mod lock;
pub mod store;
pub mod topic;

pub use store::{Lookup, MergeOutcome, RegistryError, RegistryStore, TopicEntry, REGISTRY_FILE};
pub use topic::TopicRegistry;
