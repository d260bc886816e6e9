pub mod manager;
pub mod models;
pub mod partial_update;
pub mod query_builder;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager, DbPool};
pub use partial_update::{ChangeSet, FieldNameMap, SqlFragment, SqlValue};
