//! Data-access stores: one per table family, each issuing parameterized SQL
//! and mapping empty results to [`DatabaseError::NotFound`].

pub mod company;
pub mod job;
pub mod user;

pub use company::CompanyStore;
pub use job::JobStore;
pub use user::UserStore;

