pub mod overpass;
pub mod query;

pub use overpass::{Element, FetchError, OverpassClient, OverpassResponse};
pub use query::{AreaScope, FilterClause, TagFilter, build_query};
