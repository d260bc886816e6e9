pub mod company;
pub mod error;
pub mod filter_where;
pub mod job;

pub use company::CompanyFilter;
pub use error::FilterError;
pub use filter_where::{FilterWhere, WhereClause};
pub use job::JobFilter;

/// Parses a non-negative integer query parameter.
pub(crate) fn parse_count(field: &'static str, raw: &str) -> Result<i64, FilterError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| FilterError::InvalidInteger { field, value: raw.to_string() })
}
