use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid field: {0}")]
    UnknownField(String),

    #[error("{field} must be a non-negative integer, got '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("{0}")]
    InvalidRange(String),
}
