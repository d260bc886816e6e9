pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, NewCompany};
pub use job::{Job, NewJob};
pub use user::{Credentials, NewUser, User, UserDetail};
