pub mod identifiers;

pub use identifiers::{PaperId, RegistryVersion, TopicSlug};
