pub mod fields;
pub mod request;

pub use fields::{FieldScope, SortDirection, SortKey};
pub use request::{normalize, DateBound, SearchParams, SearchRequest, MAX_RESULTS_LIMIT};
