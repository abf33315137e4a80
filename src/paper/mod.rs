pub mod record;

pub use crate::types::identifiers::PaperId;
pub use record::{DiscoveryParams, FetchedPaper, PaperRecord};
