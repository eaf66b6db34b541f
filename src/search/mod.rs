pub mod query;
pub mod text;

pub use query::{QueryKind, SearchQuery};
pub use text::{like_pattern, truncate, DOCSTRING_MAX, VALUE_MAX};
