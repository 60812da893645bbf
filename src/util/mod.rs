mod number;
mod query;

pub use number::{parse_optional_number, parse_to_number};
pub use query::QueryParams;
